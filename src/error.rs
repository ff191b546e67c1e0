/*!
This module contains the closed taxonomy of errors the evaluator can raise.
Every evaluation error carries a [`Span`] when the failing expression has
known source location, and is reported to the user on stderr by
[`crate::interpreter::Interpreter::run`] without unwinding past the current
top-level statement.
*/

use crate::formula::Formula;
use crate::unit::Unit;
use std::fmt::Display;

/// A source location, in 1-based line/column form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub line: u32,
    pub col: u32,
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Two units which were required to share a dimension but do not.
#[derive(Debug, Clone, PartialEq)]
pub struct IncompatibleUnits(pub Unit, pub Unit);

impl Display for IncompatibleUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unit {} is not convertible with unit {}", self.0, self.1)
    }
}

/// Two formulas which were required to be equal but are not.
#[derive(Debug, Clone, PartialEq)]
pub struct IncompatibleFormulas(pub Formula, pub Formula);

impl Display for IncompatibleFormulas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "formula {} is not compatible with formula {}", self.0, self.1)
    }
}

/// The reactant/product species a reaction-mediated conversion could not find.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesNotInReaction {
    pub formula: Formula,
    pub reaction: String,
}

impl Display for SpeciesNotInReaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} does not appear in reaction {}", self.formula, self.reaction)
    }
}

/// The closed set of ways evaluating a CL program can fail, one variant per
/// distinct failure a user-visible error message needs to name. The REPL
/// and script runner both catch `CLError` at the top-level-statement
/// boundary and print it rather than unwinding further.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    ScanError(String),
    ParseError(String),
    UnknownIdentifier(String),
    UnknownUnit(String),
    UnknownElement(String),
    FormulaParseError(String),
    IncompatibleUnits(IncompatibleUnits),
    IncompatibleFormulas(IncompatibleFormulas),
    DivisionByZero,
    UnbalanceableReaction(String),
    SpeciesNotInReaction(SpeciesNotInReaction),
    ArityError { expected: usize, found: usize },
    TypeError(String),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ScanError(msg) => write!(f, "scan error: {msg}"),
            ErrorKind::ParseError(msg) => write!(f, "parse error: {msg}"),
            ErrorKind::UnknownIdentifier(name) => write!(f, "unknown identifier `{name}`"),
            ErrorKind::UnknownUnit(name) => write!(f, "unknown unit `{name}`"),
            ErrorKind::UnknownElement(sym) => write!(f, "unknown element `{sym}`"),
            ErrorKind::FormulaParseError(msg) => write!(f, "formula parse error: {msg}"),
            ErrorKind::IncompatibleUnits(e) => e.fmt(f),
            ErrorKind::IncompatibleFormulas(e) => e.fmt(f),
            ErrorKind::DivisionByZero => write!(f, "division by zero"),
            ErrorKind::UnbalanceableReaction(msg) => write!(f, "reaction could not be balanced: {msg}"),
            ErrorKind::SpeciesNotInReaction(e) => e.fmt(f),
            ErrorKind::ArityError { expected, found } => {
                write!(f, "expected {expected} argument(s), found {found}")
            }
            ErrorKind::TypeError(msg) => write!(f, "type error: {msg}"),
        }
    }
}

/// An [`ErrorKind`] together with the source location it occurred at, if
/// known. This is the type every fallible evaluation function in this crate
/// returns as its `Err` variant.
#[derive(Debug, Clone, PartialEq)]
pub struct CLError {
    pub kind: ErrorKind,
    pub span: Option<Span>,
}

impl CLError {
    pub fn new(kind: ErrorKind) -> Self {
        CLError { kind, span: None }
    }

    pub fn at(kind: ErrorKind, span: Span) -> Self {
        CLError { kind, span: Some(span) }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl Display for CLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.span {
            Some(span) => write!(f, "{span}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for CLError {}

impl From<ErrorKind> for CLError {
    fn from(kind: ErrorKind) -> Self {
        CLError::new(kind)
    }
}

pub type CLResult<T> = Result<T, CLError>;
