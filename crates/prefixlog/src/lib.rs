//! `prefixlog`: a bottom-up solver for a logic language that extends
//! pure Datalog with functional-style relations, mutually-exclusive
//! choice conclusions, and integrity constraints.
//!
//! The crate is organized leaves-first, matching the component split
//! of the design document:
//!
//! - [`term`] — the term and substitution algebra (C1).
//! - [`database`] — the functional fact store, prefix store, and work
//!   queue (C2).
//! - [`rules`] — prefix chains, conclusion kinds, and the `Program`
//!   aggregate (C3).
//! - [`stepper`] — the single-step transition function (C4).
//! - [`driver`] — depth-first search to saturation (C5).
//! - [`error`] — the typed error taxonomy.
//! - [`programs`] — a small, fixed registry of built-in programs
//!   standing in for the external compiler this crate does not own.

pub mod database;
pub mod driver;
pub mod error;
pub mod programs;
pub mod rules;
pub mod stepper;
pub mod term;

pub use database::{Database, Fact, WorkItem};
pub use driver::{run, SolverConfig};
pub use error::{CompileError, DbError, DriverError, StepError, TermError};
pub use rules::{InternalConclusion, InternalPartialRule, Premise, Program, Proposition};
pub use stepper::step;
pub use term::{apply, match_pattern, Data, Pattern, Substitution};
