mod context;
mod error;
mod exchange;
mod node;
mod value;

pub use context::Context;
pub use error::{CombineError, EvalError, ValidationError};
pub use exchange::{ExchangeNode, ShapeError};
pub use node::{field, CompareOp, Connective, FieldExpr, Identifier, Literal, Node};
pub use value::Value;
