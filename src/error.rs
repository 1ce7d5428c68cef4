use thiserror::Error;

use crate::parse::SyntaxError;
use crate::{CombineError, EvalError, ShapeError, ValidationError};

/// Unified error type covering every engine operation.
///
/// Returned by operations that cross more than one stage, such as
/// [`RuleEngine::decode_json()`](crate::RuleEngine::decode_json) and
/// [`Context::from_json()`](crate::Context::from_json).
#[derive(Debug, Error)]
pub enum RuleError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Combine(#[from] CombineError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
