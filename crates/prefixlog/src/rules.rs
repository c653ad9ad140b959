//! Rule model (C3): prefix chains, conclusion kinds, and the `Program`
//! aggregate the external compiler is expected to hand the solver.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::database::Database;
use crate::term::Pattern;

/// `name(args…) = values…` — a relation name plus argument and value
/// pattern lists. Arity is `args.len() + values.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposition {
    pub name: String,
    pub args: Vec<Pattern>,
    pub values: Vec<Pattern>,
}

impl Proposition {
    pub fn new(name: impl Into<String>, args: Vec<Pattern>, values: Vec<Pattern>) -> Self {
        Proposition {
            name: name.into(),
            args,
            values,
        }
    }
}

/// A single premise of a prefix-chain position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Premise {
    Proposition(Proposition),
    Inequality { a: Pattern, b: Pattern },
}

/// A non-terminal position `ri` in a compiled rule's prefix chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalPartialRule {
    pub premise: Premise,
    pub shared: FxHashSet<String>,
    /// Non-empty list of successor position names.
    pub next: Vec<String>,
}

/// The terminal position `rn` of a compiled rule's prefix chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalConclusion {
    NewFact {
        head_name: String,
        arg_patterns: Vec<Pattern>,
        /// Alternative value lists. A non-choice head has exactly one
        /// alternative; a choice head lists each mutually-exclusive
        /// outcome.
        value_patterns: Vec<Vec<Pattern>>,
        exhaustive: bool,
    },
    Contradiction,
}

pub type PrefixName = String;

/// A fully lowered logic program: named prefix-chain positions, their
/// terminals, and the seed database to begin search from.
#[derive(Debug, Clone)]
pub struct Program {
    pub rules: FxHashMap<PrefixName, InternalPartialRule>,
    pub conclusions: FxHashMap<PrefixName, InternalConclusion>,
    pub db: Database,
}

impl Program {
    pub fn new(
        rules: FxHashMap<PrefixName, InternalPartialRule>,
        conclusions: FxHashMap<PrefixName, InternalConclusion>,
        db: Database,
    ) -> Self {
        Program {
            rules,
            conclusions,
            db,
        }
    }
}
