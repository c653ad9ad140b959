//! Typed error taxonomy, one enum per tier described in the design notes.

use crate::term::Data;

/// Errors raised by the term algebra (C1).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermError {
    #[error("pattern references unbound variable {0}")]
    UnboundVariable(String),
    #[error("pattern contains variable {0}, expected a ground term")]
    NonGround(String),
}

/// Errors raised by database insertion primitives (C2).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DbError {
    #[error("functional inconsistency on `{name}`: existing value {existing:?}, new value {new:?}")]
    FunctionalInconsistency {
        name: String,
        existing: Vec<Data>,
        new: Vec<Data>,
    },
}

/// Errors raised while statically compiling source rules.
///
/// The core never raises these itself; they exist so an embedding compiler
/// has a typed vocabulary to report the static checks it is responsible for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("head references unbound variable {0}")]
    UndefinedVariableInHead(String),
    #[error("inequality references unbound variable {0}")]
    UndefinedVariableInInequality(String),
    #[error("equality premise has non-ground left side: {0}")]
    UngroundEqualityLhs(String),
}

/// Errors raised by the stepper (C4).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("exhaustive choice head `{0}` exhausted: no alternative could be asserted")]
    ExhaustiveChoiceExhausted(String),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("compiler invariant violated: {0}")]
    CompilerInvariantViolation(String),
}

impl From<TermError> for StepError {
    fn from(e: TermError) -> Self {
        StepError::CompilerInvariantViolation(e.to_string())
    }
}

/// Errors surfaced by the search driver (C5); wraps `StepError` plus
/// driver-level faults that are not specific to one step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Step(#[from] StepError),
}
