//! The stepper (C4): advances one work item to yield zero, one, or many
//! successor databases.

use rustc_hash::FxHashMap;
use tracing::{instrument, warn};

use crate::database::{Database, InsertOutcome, WorkItem};
use crate::error::StepError;
use crate::rules::{InternalConclusion, InternalPartialRule, Premise};
use crate::term::{apply, apply_all, match_all, Data, Substitution};

/// Advances `db` by one queued work item. The returned `Vec` encodes the
/// outcome: empty means the database is closed as inconsistent, one
/// entry is a deterministic advance, more than one is a branching
/// choice.
///
/// # Preconditions
/// Must never be called with an empty queue; callers (the driver) must
/// check `db.queue_is_empty()` first. Debug builds catch the violation
/// with a `debug_assert!`; in release, calling `step` on an empty queue
/// is undefined behaviour at the model level and this function no-ops,
/// returning `db` unchanged rather than panicking.
#[instrument(level = "trace", skip_all)]
pub fn step(
    rules: &FxHashMap<String, InternalPartialRule>,
    conclusions: &FxHashMap<String, InternalConclusion>,
    db: &Database,
) -> Result<Vec<Database>, StepError> {
    debug_assert!(
        !db.queue_is_empty(),
        "step called on a database with an empty queue"
    );
    let Some((item, db)) = db.pop_queue() else {
        return Ok(vec![db.clone()]);
    };

    match item {
        WorkItem::PrefixItem { name, subst } => {
            if let Some(conclusion) = conclusions.get(&name) {
                step_terminal(&name, conclusion, &subst, db)
            } else if let Some(rule) = rules.get(&name) {
                step_partial_rule(rule, &subst, db)
            } else {
                Err(StepError::CompilerInvariantViolation(format!(
                    "prefix position `{name}` has neither a rule nor a conclusion"
                )))
            }
        }
        WorkItem::FactItem { name, args, values } => step_fact(&name, &args, &values, rules, db),
    }
}

fn step_terminal(
    head_name: &str,
    conclusion: &InternalConclusion,
    subst: &Substitution,
    db: Database,
) -> Result<Vec<Database>, StepError> {
    match conclusion {
        InternalConclusion::Contradiction => Ok(vec![]),
        InternalConclusion::NewFact {
            head_name: fact_name,
            arg_patterns,
            value_patterns,
            exhaustive,
        } => {
            let args = apply_all(subst, arg_patterns)?;
            let mut successors = Vec::new();
            let mut redundant_possibility = false;
            let mut any_inconsistent = false;

            for alternative in value_patterns {
                let values = apply_all(subst, alternative)?;
                match db.insert_fact(fact_name, args.clone(), values) {
                    InsertOutcome::Inserted(next) => successors.push(next),
                    InsertOutcome::Redundant => redundant_possibility = true,
                    InsertOutcome::Inconsistent(e) => {
                        any_inconsistent = true;
                        warn!(head = head_name, error = %e, "functional inconsistency pruned this alternative");
                    }
                }
            }

            if !exhaustive || redundant_possibility {
                successors.push(db);
            }

            if successors.is_empty() && !any_inconsistent {
                warn!(head = head_name, "exhaustive choice exhausted");
            }

            Ok(successors)
        }
    }
}

fn step_partial_rule(
    rule: &InternalPartialRule,
    subst: &Substitution,
    db: Database,
) -> Result<Vec<Database>, StepError> {
    match &rule.premise {
        Premise::Proposition(prop) => {
            let rows: Vec<(Vec<Data>, Vec<Data>)> = db
                .facts_for(&prop.name)
                .map(|(a, v)| (a.clone(), v.clone()))
                .collect();

            let mut db_acc = db;
            for (fargs, fvalues) in rows {
                if let Some(s1) = match_all(subst, &prop.args, &fargs) {
                    if let Some(s2) = match_all(&s1, &prop.values, &fvalues) {
                        for next in &rule.next {
                            db_acc = db_acc.extend_prefix(next, s2.clone());
                        }
                    }
                }
            }
            Ok(vec![db_acc])
        }
        Premise::Inequality { a, b } => {
            let a = apply(subst, a)?;
            let b = apply(subst, b)?;
            let mut db_acc = db;
            if a != b {
                for next in &rule.next {
                    db_acc = db_acc.extend_prefix(next, subst.clone());
                }
            }
            Ok(vec![db_acc])
        }
    }
}

fn step_fact(
    name: &str,
    args: &[Data],
    values: &[Data],
    rules: &FxHashMap<String, InternalPartialRule>,
    db: Database,
) -> Result<Vec<Database>, StepError> {
    let matching: Vec<(String, InternalPartialRule)> = rules
        .iter()
        .filter(|(_, rule)| matches!(&rule.premise, Premise::Proposition(p) if p.name == name))
        .map(|(n, r)| (n.clone(), r.clone()))
        .collect();

    let mut db_acc = db;
    for (prefix_name, rule) in &matching {
        let prop = match &rule.premise {
            Premise::Proposition(p) => p,
            Premise::Inequality { .. } => unreachable!("filtered to Proposition premises above"),
        };
        let substs: Vec<Substitution> = db_acc.prefixes_for(prefix_name).cloned().collect();
        for sigma in substs {
            if let Some(s1) = match_all(&sigma, &prop.args, args) {
                if let Some(s2) = match_all(&s1, &prop.values, values) {
                    for next in &rule.next {
                        db_acc = db_acc.extend_prefix(next, s2.clone());
                    }
                }
            }
        }
    }
    Ok(vec![db_acc])
}
