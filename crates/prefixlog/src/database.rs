//! Database (C2): the functional-indexed fact store, prefix store, and
//! work queue, plus the pure insertion primitives the stepper is built
//! from.

use std::collections::VecDeque;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::{DbError, TermError};
use crate::rules::Proposition;
use crate::term::{apply_all, Data, Substitution};

/// A ground proposition recorded in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub name: String,
    pub args: Vec<Data>,
    pub values: Vec<Data>,
}

/// One entry in the work queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem {
    FactItem {
        name: String,
        args: Vec<Data>,
        values: Vec<Data>,
    },
    PrefixItem {
        name: String,
        subst: Substitution,
    },
}

type Relation = IndexMap<Vec<Data>, Vec<Data>>;

/// A database value. Cloning is a full, deep structural clone — the
/// simpler of the two branching strategies the design notes allow, and
/// the one consistent with how the reference engine clones its
/// extensional/intensional maps per evaluation round.
#[derive(Debug, Clone, Default)]
pub struct Database {
    facts: FxHashMap<String, Relation>,
    /// Facts proved redundant by some terminal step and marked as not
    /// needing further propagation. The forward-chaining algorithm never
    /// populates this automatically; it is an extension point for
    /// embedding compilers (see DESIGN.md).
    uninteresting: FxHashMap<String, Relation>,
    prefixes: FxHashMap<String, IndexSet<Substitution>>,
    queue: VecDeque<WorkItem>,
}

/// Outcome of `insert_fact`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(Database),
    Redundant,
    Inconsistent(DbError),
}

impl Database {
    pub fn new() -> Self {
        Database::default()
    }

    /// Looks up the stored value list for `(name, args)`, if any.
    pub fn lookup(&self, name: &str, args: &[Data]) -> Option<&[Data]> {
        self.facts
            .get(name)
            .and_then(|rel| rel.get(args))
            .map(Vec::as_slice)
    }

    /// All stored `(args, values)` pairs for a relation name, in stable
    /// (insertion) order.
    pub fn facts_for(&self, name: &str) -> impl Iterator<Item = (&Vec<Data>, &Vec<Data>)> {
        self.facts
            .get(name)
            .into_iter()
            .flat_map(|rel| rel.iter())
    }

    pub fn all_facts(&self) -> impl Iterator<Item = Fact> + '_ {
        self.facts.iter().flat_map(|(name, rel)| {
            rel.iter().map(move |(args, values)| Fact {
                name: name.clone(),
                args: args.clone(),
                values: values.clone(),
            })
        })
    }

    pub fn prefixes_for(&self, name: &str) -> impl Iterator<Item = &Substitution> {
        self.prefixes.get(name).into_iter().flat_map(|s| s.iter())
    }

    pub fn all_prefixes(&self) -> impl Iterator<Item = (&String, &Substitution)> {
        self.prefixes
            .iter()
            .flat_map(|(name, set)| set.iter().map(move |s| (name, s)))
    }

    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn queue(&self) -> impl Iterator<Item = &WorkItem> {
        self.queue.iter()
    }

    /// Attempts to insert a fact, respecting the functional invariant:
    /// one value list per `(name, args)` key.
    pub fn insert_fact(&self, name: &str, args: Vec<Data>, values: Vec<Data>) -> InsertOutcome {
        if let Some(existing) = self
            .uninteresting
            .get(name)
            .and_then(|rel| rel.get(&args))
        {
            return if existing == &values {
                InsertOutcome::Redundant
            } else {
                InsertOutcome::Inconsistent(DbError::FunctionalInconsistency {
                    name: name.to_string(),
                    existing: existing.clone(),
                    new: values,
                })
            };
        }

        if let Some(existing) = self.facts.get(name).and_then(|rel| rel.get(&args)) {
            return if existing == &values {
                InsertOutcome::Redundant
            } else {
                InsertOutcome::Inconsistent(DbError::FunctionalInconsistency {
                    name: name.to_string(),
                    existing: existing.clone(),
                    new: values,
                })
            };
        }

        let mut next = self.clone();
        next.facts
            .entry(name.to_string())
            .or_default()
            .insert(args.clone(), values.clone());
        next.queue.push_back(WorkItem::FactItem {
            name: name.to_string(),
            args,
            values,
        });
        trace!(relation = name, "inserted fact");
        InsertOutcome::Inserted(next)
    }

    /// Moves a fact into the `uninteresting` set, suppressing any future
    /// re-firing for the same `(name, args)` key without enqueuing work.
    pub fn mark_uninteresting(&self, name: &str, args: Vec<Data>, values: Vec<Data>) -> Database {
        let mut next = self.clone();
        next.uninteresting
            .entry(name.to_string())
            .or_default()
            .insert(args, values);
        next
    }

    /// Extends `prefixes[name]` with `subst` unless an equivalent
    /// substitution is already present, in which case the database is
    /// returned unchanged (no queue entry is added).
    pub fn extend_prefix(&self, name: &str, subst: Substitution) -> Database {
        if self
            .prefixes
            .get(name)
            .is_some_and(|set| set.contains(&subst))
        {
            return self.clone();
        }
        let mut next = self.clone();
        next.prefixes
            .entry(name.to_string())
            .or_default()
            .insert(subst.clone());
        next.queue.push_back(WorkItem::PrefixItem {
            name: name.to_string(),
            subst,
        });
        trace!(prefix = name, "extended prefix");
        next
    }

    /// Pops the oldest queue entry, if any, returning the remainder.
    pub fn pop_queue(&self) -> Option<(WorkItem, Database)> {
        let mut next = self.clone();
        let item = next.queue.pop_front()?;
        Some((item, next))
    }
}

/// Builds the ground fact a proposition denotes under a substitution.
pub fn apply_proposition(subst: &Substitution, proposition: &Proposition) -> Result<Fact, TermError> {
    Ok(Fact {
        name: proposition.name.clone(),
        args: apply_all(subst, &proposition.args)?,
        values: apply_all(subst, &proposition.values)?,
    })
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for a in &self.args {
            write!(f, " {a}")?;
        }
        if !self.values.is_empty() {
            write!(f, " =")?;
            for v in &self.values {
                write!(f, " {v}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkItem::FactItem { name, args, values } => {
                let fact = Fact {
                    name: name.clone(),
                    args: args.clone(),
                    values: values.clone(),
                };
                write!(f, "{fact}")
            }
            WorkItem::PrefixItem { name, subst } => write!(f, "{name}{{ {} }}", fmt_subst(subst)),
        }
    }
}

fn fmt_subst(subst: &Substitution) -> String {
    subst
        .iter()
        .map(|(k, v)| format!("{v}/{k}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Queue")?;
        for item in &self.queue {
            writeln!(f, "  {item}")?;
        }
        writeln!(f, "Database")?;
        let mut names: Vec<&String> = self.facts.keys().collect();
        names.sort();
        for name in names {
            for (args, values) in &self.facts[name] {
                let fact = Fact {
                    name: name.clone(),
                    args: args.clone(),
                    values: values.clone(),
                };
                writeln!(f, "  {fact}")?;
            }
        }
        let mut prefix_names: Vec<&String> = self.prefixes.keys().collect();
        prefix_names.sort();
        for name in prefix_names {
            for subst in &self.prefixes[name] {
                writeln!(f, "  {name}{{ {} }}", fmt_subst(subst))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(name: &str) -> Data {
        Data::Const(name.to_string(), vec![])
    }

    #[test]
    fn insert_then_reinsert_same_value_is_redundant() {
        let db = Database::new();
        let InsertOutcome::Inserted(db) = db.insert_fact("home", vec![d("celeste")], vec![d("uplands")]) else {
            panic!("expected insert");
        };
        assert_eq!(
            db.insert_fact("home", vec![d("celeste")], vec![d("uplands")]),
            InsertOutcome::Redundant
        );
    }

    #[test]
    fn insert_then_reinsert_different_value_is_inconsistent() {
        let db = Database::new();
        let InsertOutcome::Inserted(db) = db.insert_fact("home", vec![d("celeste")], vec![d("uplands")]) else {
            panic!("expected insert");
        };
        let outcome = db.insert_fact("home", vec![d("celeste")], vec![d("doghouse")]);
        assert!(matches!(outcome, InsertOutcome::Inconsistent(_)));
    }

    #[test]
    fn extend_prefix_dedups_equal_substitutions() {
        let db = Database::new();
        let subst = Substitution::new().extended("X".into(), d("a"));
        let db2 = db.extend_prefix("r1", subst.clone());
        assert_eq!(db2.queue().count(), 1);
        let db3 = db2.extend_prefix("r1", subst);
        assert_eq!(db3.queue().count(), 1);
    }

    #[test]
    fn pop_queue_preserves_fifo_order() {
        let db = Database::new();
        let InsertOutcome::Inserted(db) = db.insert_fact("a", vec![], vec![]) else {
            panic!()
        };
        let InsertOutcome::Inserted(db) = db.insert_fact("b", vec![], vec![]) else {
            panic!()
        };
        let (first, db) = db.pop_queue().unwrap();
        assert!(matches!(first, WorkItem::FactItem { name, .. } if name == "a"));
        let (second, _) = db.pop_queue().unwrap();
        assert!(matches!(second, WorkItem::FactItem { name, .. } if name == "b"));
    }
}
