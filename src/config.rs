use serde::{Deserialize, Serialize};

/// Default maximum tree depth accepted by the parser and the combiner.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Resource limits applied when building trees.
///
/// Deserializable so hosts can embed it in their own configuration; missing
/// fields take their defaults.
///
/// ```
/// use rulekit::Limits;
///
/// let limits: Limits = serde_json::from_str(r#"{"max_depth": 16}"#).unwrap();
/// assert_eq!(limits, Limits::new().with_max_depth(16));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum height of a parsed or combined tree. A single comparison has
    /// depth 1, so a chain of `n` comparisons has depth `n`.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Limits {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(Limits::default().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let limits: Limits = serde_json::from_str("{}").unwrap();
        assert_eq!(limits, Limits::default());
    }

    #[test]
    fn builder_overrides() {
        assert_eq!(Limits::new().with_max_depth(4).max_depth, 4);
    }
}
