//! Centralised error hierarchy for the **Monkey interpreter**.
//!
//! Parsing and evaluation each have their own closed taxonomy
//! ([`ParseError`], [`RuntimeError`]). Both are fatal to the current input:
//! there is no recovery and no partial result. The umbrella [`MonkeyError`]
//! lets the front end handle either with one `?`.
//!
//! The module **does not** print diagnostics itself.

use thiserror::Error;

use log::debug;

use crate::token::{Token, TokenKind};

/// Syntactic failure. One error aborts the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A specific token kind was required but something else was found.
    #[error("expected next token to be {expected}, got {found} ({literal:?}) instead")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        literal: String,
    },

    /// The current token cannot start an expression.
    #[error("no prefix parse function for {kind} ({literal:?})")]
    NoPrefixParse { kind: TokenKind, literal: String },

    /// An INT token whose text does not fit a 64-bit signed integer.
    #[error("could not parse {0:?} as integer")]
    InvalidInteger(String),
}

impl ParseError {
    /// Helper constructor for a failed expectation on `found`.
    pub fn unexpected(expected: TokenKind, found: &Token<'_>) -> Self {
        debug!(
            "Creating Parse error: expected={}, found={} {:?}",
            expected, found.kind, found.literal
        );

        ParseError::UnexpectedToken {
            expected,
            found: found.kind,
            literal: found.literal.to_owned(),
        }
    }

    pub fn no_prefix(token: &Token<'_>) -> Self {
        debug!("Creating Parse error: no prefix handler for {}", token);

        ParseError::NoPrefixParse {
            kind: token.kind,
            literal: token.literal.to_owned(),
        }
    }
}

/// Semantic failure during evaluation. Operands are named by their
/// `inspect()` form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("used an undeclared identifier \"{0}\"")]
    UndeclaredIdentifier(String),

    #[error("not a function: {0}")]
    NotAFunction(String),

    #[error("type mismatch: {operator}{operand}")]
    PrefixTypeMismatch { operator: String, operand: String },

    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: String,
        operator: String,
        right: String,
    },

    #[error("unknown operator: {left} {operator} {right}")]
    UnknownOperator {
        left: String,
        operator: String,
        right: String,
    },

    #[error("division by zero: {0} / 0")]
    DivisionByZero(i64),

    #[error("integer overflow in {0}")]
    IntegerOverflow(String),

    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
}

impl RuntimeError {
    /// Helper constructor for two-operand failures.
    pub fn type_mismatch(left: String, operator: &str, right: String) -> Self {
        debug!(
            "Creating Runtime error: type mismatch {} {} {}",
            left, operator, right
        );

        RuntimeError::TypeMismatch {
            left,
            operator: operator.to_owned(),
            right,
        }
    }

    pub fn unknown_operator(left: String, operator: &str, right: String) -> Self {
        debug!(
            "Creating Runtime error: unknown operator {} {} {}",
            left, operator, right
        );

        RuntimeError::UnknownOperator {
            left,
            operator: operator.to_owned(),
            right,
        }
    }
}

/// Canonical error type at the crate boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MonkeyError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MonkeyError>;
