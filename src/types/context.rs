use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::exchange::ShapeError;
use super::Value;
use crate::RuleError;

/// Evaluation context mapping field names to [`Value`]s.
///
/// Supplied fresh for each evaluation; the engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    data: HashMap<String, Value>,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, builder style.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    /// Insert a field value (mutable reference version).
    pub fn insert(&mut self, name: &str, value: Value) {
        self.data.insert(name.to_owned(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Build a context from a JSON object of scalar fields.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Json`] for malformed JSON and [`RuleError::Shape`]
    /// if the document is not an object or holds non-scalar values.
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Ok(Self::from_json_value(&value)?)
    }

    /// Build a context from an already-parsed JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if `value` is not an object, or if a field holds
    /// `null`, a boolean, an array, or an object.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, ShapeError> {
        let serde_json::Value::Object(map) = value else {
            return Err(ShapeError::ContextNotObject {
                found: json_kind(value),
            });
        };

        let mut ctx = Context::new();
        for (name, field_value) in map {
            let value = match field_value {
                serde_json::Value::String(s) => Value::String(s.clone()),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => Value::Int(i),
                    None => Value::Float(n.as_f64().ok_or_else(|| {
                        ShapeError::UnsupportedValue {
                            field: name.clone(),
                            found: "number",
                        }
                    })?),
                },
                other => {
                    return Err(ShapeError::UnsupportedValue {
                        field: name.clone(),
                        found: json_kind(other),
                    });
                }
            };
            ctx.insert(name, value);
        }
        Ok(ctx)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
