//! Term and substitution algebra (C1): ground data, patterns with
//! variables, first-order matching, substitution application, and the
//! surface-syntax printer/parser used for traces.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashSet;

use crate::error::TermError;

/// A pattern: ground data plus variables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pattern {
    Const(String, Vec<Pattern>),
    Int(i64),
    Str(String),
    Triv,
    Var(String),
}

/// A ground term: the same shape as `Pattern` without `Var`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Data {
    Const(String, Vec<Data>),
    Int(i64),
    Str(String),
    Triv,
}

impl Pattern {
    pub fn free_vars(&self) -> FxHashSet<String> {
        let mut out = FxHashSet::default();
        self.collect_free_vars(&mut out);
        out
    }

    fn collect_free_vars(&self, out: &mut FxHashSet<String>) {
        match self {
            Pattern::Const(_, args) => {
                for a in args {
                    a.collect_free_vars(out);
                }
            }
            Pattern::Var(x) => {
                out.insert(x.clone());
            }
            Pattern::Int(_) | Pattern::Str(_) | Pattern::Triv => {}
        }
    }

    /// Witness that a pattern contains no variables, yielding the
    /// corresponding ground `Data`. Fails with `NonGround` at the first
    /// `Var` node encountered.
    pub fn assert_ground(&self) -> Result<Data, TermError> {
        match self {
            Pattern::Const(name, args) => {
                let args = args
                    .iter()
                    .map(Pattern::assert_ground)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Data::Const(name.clone(), args))
            }
            Pattern::Int(v) => Ok(Data::Int(*v)),
            Pattern::Str(v) => Ok(Data::Str(v.clone())),
            Pattern::Triv => Ok(Data::Triv),
            Pattern::Var(x) => Err(TermError::NonGround(x.clone())),
        }
    }
}

impl From<Data> for Pattern {
    fn from(d: Data) -> Self {
        match d {
            Data::Const(name, args) => {
                Pattern::Const(name, args.into_iter().map(Pattern::from).collect())
            }
            Data::Int(v) => Pattern::Int(v),
            Data::Str(v) => Pattern::Str(v),
            Data::Triv => Pattern::Triv,
        }
    }
}

/// A finite, immutable mapping from variable name to `Data`. Extension
/// always produces a new substitution; a `BTreeMap` gives canonical,
/// name-sorted iteration for free, which both prefix-store equality and
/// the dump format rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Substitution(BTreeMap<String, Data>);

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Data> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns a new substitution extended with `name ↦ value`. Does not
    /// check for a prior conflicting binding; callers that need that
    /// should consult `get` first (as `match_pattern` does).
    pub fn extended(&self, name: String, value: Data) -> Self {
        let mut next = self.0.clone();
        next.insert(name, value);
        Substitution(next)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Data)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// First-order one-way matching: extends `subst` so that `apply(subst',
/// pattern) == data`, or fails. No occurs check — patterns are only ever
/// matched against ground data, never against other patterns.
pub fn match_pattern(subst: &Substitution, pattern: &Pattern, data: &Data) -> Option<Substitution> {
    match (pattern, data) {
        (Pattern::Const(pn, pargs), Data::Const(dn, dargs)) => {
            if pn != dn || pargs.len() != dargs.len() {
                return None;
            }
            let mut current = subst.clone();
            for (p, d) in pargs.iter().zip(dargs.iter()) {
                current = match_pattern(&current, p, d)?;
            }
            Some(current)
        }
        (Pattern::Int(a), Data::Int(b)) if a == b => Some(subst.clone()),
        (Pattern::Str(a), Data::Str(b)) if a == b => Some(subst.clone()),
        (Pattern::Triv, Data::Triv) => Some(subst.clone()),
        (Pattern::Var(x), _) => match subst.get(x) {
            Some(bound) => {
                let bound = bound.clone();
                match_pattern(subst, &Pattern::from(bound), data)
            }
            None => Some(subst.extended(x.clone(), data.clone())),
        },
        _ => None,
    }
}

/// Matches a whole list of patterns against a list of data pointwise,
/// threading the substitution through.
pub fn match_all(subst: &Substitution, patterns: &[Pattern], data: &[Data]) -> Option<Substitution> {
    if patterns.len() != data.len() {
        return None;
    }
    let mut current = subst.clone();
    for (p, d) in patterns.iter().zip(data.iter()) {
        current = match_pattern(&current, p, d)?;
    }
    Some(current)
}

/// Structural substitution application: fails with `UnboundVariable` if a
/// `Var` node is reached that isn't bound in `subst`.
pub fn apply(subst: &Substitution, pattern: &Pattern) -> Result<Data, TermError> {
    match pattern {
        Pattern::Const(name, args) => {
            let args = args
                .iter()
                .map(|a| apply(subst, a))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Data::Const(name.clone(), args))
        }
        Pattern::Int(v) => Ok(Data::Int(*v)),
        Pattern::Str(v) => Ok(Data::Str(v.clone())),
        Pattern::Triv => Ok(Data::Triv),
        Pattern::Var(x) => subst
            .get(x)
            .cloned()
            .ok_or_else(|| TermError::UnboundVariable(x.clone())),
    }
}

pub fn apply_all(subst: &Substitution, patterns: &[Pattern]) -> Result<Vec<Data>, TermError> {
    patterns.iter().map(|p| apply(subst, p)).collect()
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Const(name, args) if args.is_empty() => write!(f, "{name}"),
            Data::Const(name, args) => {
                write!(f, "{name}")?;
                for a in args {
                    write!(f, " {}", Paren(a))?;
                }
                Ok(())
            }
            Data::Int(v) => write!(f, "{v}"),
            Data::Str(v) => write!(f, "\"{v}\""),
            Data::Triv => write!(f, "()"),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Const(name, args) if args.is_empty() => write!(f, "{name}"),
            Pattern::Const(name, args) => {
                write!(f, "{name}")?;
                for a in args {
                    write!(f, " {}", ParenPat(a))?;
                }
                Ok(())
            }
            Pattern::Int(v) => write!(f, "{v}"),
            Pattern::Str(v) => write!(f, "\"{v}\""),
            Pattern::Triv => write!(f, "()"),
            Pattern::Var(x) => write!(f, "{x}"),
        }
    }
}

/// Wraps a compound `Data` argument in parens when printed inside a
/// bigger term, matching the surface grammar's `(` term `)` production.
struct Paren<'a>(&'a Data);
impl fmt::Display for Paren<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Data::Const(_, args) if !args.is_empty() => write!(f, "({})", self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

struct ParenPat<'a>(&'a Pattern);
impl fmt::Display for ParenPat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Pattern::Const(_, args) if !args.is_empty() => write!(f, "({})", self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// A minimal recursive-descent reader for the surface term grammar of
/// the external interfaces, used only to round-trip printed terms in
/// traces and tests — not a rule/program compiler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    Eof,
    #[error("unmatched quote in string literal")]
    UnmatchedQuote,
    #[error("non-canonical integer literal: {0}")]
    NonCanonicalInt(String),
    #[error("unexpected character `{0}`")]
    Unexpected(char),
}

pub fn parse_data(input: &str) -> Result<Data, ParseError> {
    let mut reader = Reader::new(input);
    let data = reader.read_data()?;
    Ok(data)
}

struct Reader<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Reader {
            chars: input.chars().peekable(),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn read_data(&mut self) -> Result<Data, ParseError> {
        self.skip_ws();
        match self.chars.peek().copied() {
            None => Err(ParseError::Eof),
            Some('"') => self.read_string(),
            Some('(') => self.read_paren(),
            Some(c) if c.is_ascii_digit() => self.read_int(),
            Some(c) if c.is_ascii_lowercase() => self.read_const(),
            Some(c) => Err(ParseError::Unexpected(c)),
        }
    }

    fn read_string(&mut self) -> Result<Data, ParseError> {
        self.chars.next();
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(Data::Str(s)),
                Some(c) => s.push(c),
                None => return Err(ParseError::UnmatchedQuote),
            }
        }
    }

    fn read_paren(&mut self) -> Result<Data, ParseError> {
        self.chars.next();
        self.skip_ws();
        if self.chars.peek() == Some(&')') {
            self.chars.next();
            return Ok(Data::Triv);
        }
        let inner = self.read_data()?;
        self.skip_ws();
        match self.chars.next() {
            Some(')') => Ok(inner),
            Some(c) => Err(ParseError::Unexpected(c)),
            None => Err(ParseError::Eof),
        }
    }

    fn read_int(&mut self) -> Result<Data, ParseError> {
        let mut digits = String::new();
        while matches!(self.chars.peek(), Some(c) if c.is_ascii_digit()) {
            digits.push(self.chars.next().unwrap());
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(ParseError::NonCanonicalInt(digits));
        }
        digits
            .parse::<i64>()
            .map(Data::Int)
            .map_err(|_| ParseError::NonCanonicalInt(digits))
    }

    fn read_const(&mut self) -> Result<Data, ParseError> {
        let mut name = String::new();
        while matches!(self.chars.peek(), Some(c) if c.is_alphanumeric() || *c == '_') {
            name.push(self.chars.next().unwrap());
        }
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            match self.chars.peek().copied() {
                Some(c) if c == '"' || c == '(' || c.is_ascii_digit() || c.is_ascii_lowercase() => {
                    args.push(self.read_data()?);
                }
                _ => break,
            }
        }
        Ok(Data::Const(name, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_const_threads_substitution() {
        let subst = Substitution::new();
        let pattern = Pattern::Const(
            "edge".into(),
            vec![Pattern::Var("X".into()), Pattern::Var("Y".into())],
        );
        let data = Data::Const(
            "edge".into(),
            vec![Data::Const("a".into(), vec![]), Data::Const("b".into(), vec![])],
        );
        let result = match_pattern(&subst, &pattern, &data).unwrap();
        assert_eq!(result.get("X"), Some(&Data::Const("a".into(), vec![])));
        assert_eq!(result.get("Y"), Some(&Data::Const("b".into(), vec![])));
    }

    #[test]
    fn match_repeated_variable_requires_agreement() {
        let subst = Substitution::new();
        let pattern = Pattern::Const(
            "eq".into(),
            vec![Pattern::Var("X".into()), Pattern::Var("X".into())],
        );
        let ok = Data::Const(
            "eq".into(),
            vec![Data::Int(1), Data::Int(1)],
        );
        let bad = Data::Const(
            "eq".into(),
            vec![Data::Int(1), Data::Int(2)],
        );
        assert!(match_pattern(&subst, &pattern, &ok).is_some());
        assert!(match_pattern(&subst, &pattern, &bad).is_none());
    }

    #[test]
    fn apply_after_match_reproduces_data() {
        let subst = Substitution::new();
        let pattern = Pattern::Const("p".into(), vec![Pattern::Var("X".into())]);
        let data = Data::Const("p".into(), vec![Data::Int(42)]);
        let subst2 = match_pattern(&subst, &pattern, &data).unwrap();
        assert_eq!(apply(&subst2, &pattern).unwrap(), data);
    }

    #[test]
    fn apply_unbound_variable_fails() {
        let subst = Substitution::new();
        let err = apply(&subst, &Pattern::Var("X".into())).unwrap_err();
        assert_eq!(err, TermError::UnboundVariable("X".into()));
    }

    #[test]
    fn assert_ground_rejects_variables() {
        let pattern = Pattern::Const("p".into(), vec![Pattern::Var("X".into())]);
        assert!(matches!(pattern.assert_ground(), Err(TermError::NonGround(_))));
    }

    #[test]
    fn parse_round_trips_display() {
        let data = Data::Const(
            "edge".into(),
            vec![Data::Const("a".into(), vec![]), Data::Int(3)],
        );
        let printed = data.to_string();
        let parsed = parse_data(&printed).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn parse_rejects_noncanonical_int() {
        assert!(matches!(parse_data("01"), Err(ParseError::NonCanonicalInt(_))));
    }
}
