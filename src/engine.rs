use crate::combine::{combine_with, RuleSource};
use crate::parse::{parse_with, SyntaxError};
use crate::{
    evaluate, CombineError, Connective, Context, EvalError, ExchangeNode, Limits, Node, RuleError,
    ValidationError,
};

/// Entry point bundling the engine operations with a set of [`Limits`].
///
/// The free functions [`parse`](crate::parse()), [`evaluate`](crate::evaluate())
/// and [`combine`](crate::combine()) behave like `RuleEngine::default()`.
/// An engine holds no state beyond its limits and can be shared freely
/// across threads.
///
/// ```
/// use rulekit::{Context, Limits, RuleEngine};
///
/// let engine = RuleEngine::with_limits(Limits::new().with_max_depth(8));
/// let rule = engine.parse("age > 30 AND department = 'Sales'").unwrap();
/// let ctx = Context::new().set("age", 35_i64).set("department", "Sales");
/// assert!(engine.evaluate(&rule, &ctx).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleEngine {
    limits: Limits,
}

impl RuleEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Parse a rule string.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError`] on malformed input or a tree deeper than the
    /// engine's depth limit.
    pub fn parse(&self, rule: &str) -> Result<Node, SyntaxError> {
        parse_with(rule, self.limits)
    }

    /// Evaluate a rule against a context.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](crate::evaluate()).
    pub fn evaluate(&self, rule: &Node, ctx: &Context) -> Result<bool, EvalError> {
        evaluate(rule, ctx)
    }

    /// Combine rules under `connective`.
    ///
    /// # Errors
    ///
    /// See [`combine`](crate::combine()).
    pub fn combine<'a, I, S>(&self, rules: I, connective: Connective) -> Result<Node, CombineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<RuleSource<'a>>,
    {
        combine_with(rules, connective, self.limits)
    }

    /// Decode a rule tree stored in the JSON exchange shape.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Json`] for invalid JSON, [`RuleError::Shape`] for
    /// JSON that is not a well-formed rule tree, and [`RuleError::Validation`]
    /// if the tree is deeper than the engine's depth limit.
    pub fn decode_json(&self, json: &str) -> Result<Node, RuleError> {
        let tree: ExchangeNode = serde_json::from_str(json)?;
        let node = Node::try_from(tree)?;
        self.check_depth(&node)?;
        tracing::debug!(
            comparisons = node.comparisons(),
            depth = node.depth(),
            "decoded rule tree"
        );
        Ok(node)
    }

    /// Evaluate a stored exchange tree directly.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnsupportedOperator`] if the tree carries an
    /// operator the engine does not know, [`EvalError::MalformedTree`] for
    /// any other shape problem, and the usual evaluation errors otherwise.
    pub fn evaluate_exchange(&self, tree: &ExchangeNode, ctx: &Context) -> Result<bool, EvalError> {
        let node = Node::try_from(tree)?;
        if let Err(err) = self.check_depth(&node) {
            return Err(EvalError::MalformedTree {
                reason: err.to_string(),
            });
        }
        evaluate(&node, ctx)
    }

    /// Decode a JSON exchange tree and evaluate it in one step.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Json`] for invalid JSON and [`RuleError::Eval`]
    /// for everything [`evaluate_exchange`](Self::evaluate_exchange) rejects.
    pub fn evaluate_json(&self, json: &str, ctx: &Context) -> Result<bool, RuleError> {
        let tree: ExchangeNode = serde_json::from_str(json)?;
        Ok(self.evaluate_exchange(&tree, ctx)?)
    }

    /// Decode a binary cache blob under the engine's limits. With `source`,
    /// the blob must have been encoded from exactly that rule string.
    ///
    /// # Errors
    ///
    /// See [`Node::from_bytes`] and [`Node::from_bytes_checked`].
    #[cfg(feature = "binary-cache")]
    pub fn decode_bytes(
        &self,
        bytes: &[u8],
        source: Option<&str>,
    ) -> Result<Node, crate::DeserializeError> {
        crate::serial::decode(bytes, source, self.limits)
    }

    fn check_depth(&self, node: &Node) -> Result<(), ValidationError> {
        let depth = node.depth();
        if depth > self.limits.max_depth {
            return Err(ValidationError::TooDeep {
                depth,
                limit: self.limits.max_depth,
            });
        }
        Ok(())
    }
}
