use thiserror::Error;

use super::exchange::ShapeError;
use crate::parse::SyntaxError;

/// Errors produced while evaluating a rule against a context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unknown field '{name}'")]
    UnknownField { name: String },

    #[error("cannot compare field '{field}' ({expected}) with {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("unsupported operator '{operator}'")]
    UnsupportedOperator { operator: String },

    #[error("malformed rule tree: {reason}")]
    MalformedTree { reason: String },
}

impl From<ShapeError> for EvalError {
    fn from(err: ShapeError) -> Self {
        match err {
            ShapeError::UnsupportedOperator { value } => {
                EvalError::UnsupportedOperator { operator: value }
            }
            other => EvalError::MalformedTree {
                reason: other.to_string(),
            },
        }
    }
}

/// Errors produced when rule inputs fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cannot combine an empty list of rules")]
    EmptyCombineList,

    #[error("rule at index {index} is empty")]
    EmptyRule { index: usize },

    #[error("rule depth {depth} exceeds the maximum of {limit}")]
    TooDeep { depth: usize, limit: usize },
}

/// Errors produced when combining rules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("rule at index {index} failed to parse: {source}")]
    Rule {
        index: usize,
        #[source]
        source: SyntaxError,
    },
}
