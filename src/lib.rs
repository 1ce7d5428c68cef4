//! A small rule engine: parse textual rules such as
//! `age > 30 AND department = 'Sales'` into a typed tree, evaluate that tree
//! against a context of field values, and combine rules under `AND`/`OR`.
//!
//! ```
//! use rulekit::{combine, evaluate, parse, Connective, Context};
//!
//! let rule = parse("age > 30 AND department = 'Sales'").unwrap();
//! let ctx = Context::new().set("age", 35_i64).set("department", "Sales");
//! assert!(evaluate(&rule, &ctx).unwrap());
//!
//! let either = combine(["age > 60", "department = Sales"], Connective::Or).unwrap();
//! assert!(evaluate(&either, &ctx).unwrap());
//! ```
//!
//! Trees serialize to and from a JSON exchange shape (see [`ExchangeNode`])
//! for storage in external rule stores. With the `binary-cache` feature a
//! tree can also be written to a compact checksummed binary form.

mod combine;
mod config;
mod engine;
mod error;
mod evaluate;
pub mod parse;
#[cfg(feature = "binary-cache")]
mod serial;
mod types;

pub use combine::{combine, combine_all, RuleSource};
pub use config::{Limits, DEFAULT_MAX_DEPTH};
pub use engine::RuleEngine;
pub use error::RuleError;
pub use evaluate::evaluate;
pub use parse::{parse, parse_with, SyntaxError};
#[cfg(feature = "binary-cache")]
pub use serial::{DeserializeError, SerializeError};
pub use types::{
    field, CombineError, CompareOp, Connective, Context, EvalError, ExchangeNode, FieldExpr,
    Identifier, Literal, Node, ShapeError, ValidationError, Value,
};
