//! `prefixlog-cli <program-name> [--all]`
//!
//! Runs the search driver on a built-in program and reports the
//! saturated models found. Since the declaration-to-rule compiler is
//! out of scope for this crate, the "program name" resolves against the
//! fixed registry in `prefixlog::programs` rather than a source file —
//! see DESIGN.md.

use std::env;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use prefixlog::driver::{run, SolverConfig};
use prefixlog::programs;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run_cli() {
        Ok(found_model) => {
            if found_model {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> Result<bool> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Err(anyhow!("missing program name"));
    }

    let program_name = &args[1];
    let print_all = args.iter().any(|a| a == "--all");

    let program = programs::lookup(program_name)
        .with_context(|| format!("unknown program `{program_name}`"))?;

    let models = run(&program, &SolverConfig::unbounded(), None)
        .context("search driver failed")?;

    if models.is_empty() {
        println!("no saturated models (program is unsatisfiable)");
        return Ok(false);
    }

    println!("{} saturated model(s) found", models.len());
    if print_all {
        for (i, model) in models.iter().enumerate() {
            println!("--- model {i} ---");
            print!("{model}");
        }
    } else {
        print!("{}", models[0]);
    }

    Ok(true)
}

fn print_usage() {
    eprintln!("Usage: prefixlog-cli <program-name> [--all]");
    eprintln!("Programs:");
    for name in programs::NAMES {
        eprintln!("  {name}");
    }
}
