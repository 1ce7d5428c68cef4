use crate::parse::parse_with;
use crate::{CombineError, Connective, Limits, Node, ValidationError};

/// One input to [`combine`]: a rule string to parse, or an existing tree.
#[derive(Debug, Clone, Copy)]
pub enum RuleSource<'a> {
    Text(&'a str),
    Tree(&'a Node),
}

impl<'a> From<&'a str> for RuleSource<'a> {
    fn from(text: &'a str) -> Self {
        RuleSource::Text(text)
    }
}

impl<'a> From<&'a String> for RuleSource<'a> {
    fn from(text: &'a String) -> Self {
        RuleSource::Text(text)
    }
}

impl<'a> From<&'a Node> for RuleSource<'a> {
    fn from(node: &'a Node) -> Self {
        RuleSource::Tree(node)
    }
}

/// Fold rules left-associatively under `connective`.
///
/// A single rule is returned unchanged. Inputs are borrowed and never
/// modified; the result owns copies of their subtrees.
///
/// ```
/// use rulekit::{combine, evaluate, Connective, Context};
///
/// let rule = combine(["age > 30 OR experience >= 5", "salary > 50000"], Connective::And).unwrap();
/// let ctx = Context::new()
///     .set("age", 25_i64)
///     .set("experience", 6_i64)
///     .set("salary", 40000_i64);
/// assert!(!evaluate(&rule, &ctx).unwrap());
/// ```
///
/// # Errors
///
/// Returns [`ValidationError::EmptyCombineList`] for an empty input,
/// [`ValidationError::EmptyRule`] for a blank rule string,
/// [`CombineError::Rule`] if a rule string fails to parse, and
/// [`ValidationError::TooDeep`] if the result exceeds the depth limit.
pub fn combine<'a, I, S>(rules: I, connective: Connective) -> Result<Node, CombineError>
where
    I: IntoIterator<Item = S>,
    S: Into<RuleSource<'a>>,
{
    combine_with(rules, connective, Limits::default())
}

/// [`combine`] with the default connective (`AND`).
///
/// # Errors
///
/// See [`combine`].
pub fn combine_all<'a, I, S>(rules: I) -> Result<Node, CombineError>
where
    I: IntoIterator<Item = S>,
    S: Into<RuleSource<'a>>,
{
    combine(rules, Connective::default())
}

pub(crate) fn combine_with<'a, I, S>(
    rules: I,
    connective: Connective,
    limits: Limits,
) -> Result<Node, CombineError>
where
    I: IntoIterator<Item = S>,
    S: Into<RuleSource<'a>>,
{
    let mut combined: Option<(Node, usize)> = None;
    let mut inputs = 0_usize;

    for (index, source) in rules.into_iter().map(Into::into).enumerate() {
        let node = resolve(index, source, limits)?;
        let depth = check_depth(node.depth(), limits)?;
        combined = Some(match combined {
            None => (node, depth),
            Some((acc, acc_depth)) => {
                let depth = check_depth(1 + acc_depth.max(depth), limits)?;
                (Node::logical(connective, acc, node), depth)
            }
        });
        inputs += 1;
    }

    let (node, depth) = combined.ok_or(ValidationError::EmptyCombineList)?;
    tracing::debug!(inputs, %connective, depth, "combined rules");
    Ok(node)
}

fn resolve(index: usize, source: RuleSource<'_>, limits: Limits) -> Result<Node, CombineError> {
    match source {
        RuleSource::Text(text) if text.trim().is_empty() => {
            Err(ValidationError::EmptyRule { index }.into())
        }
        RuleSource::Text(text) => {
            parse_with(text, limits).map_err(|source| CombineError::Rule { index, source })
        }
        RuleSource::Tree(node) => Ok(node.clone()),
    }
}

fn check_depth(depth: usize, limits: Limits) -> Result<usize, ValidationError> {
    if depth > limits.max_depth {
        return Err(ValidationError::TooDeep {
            depth,
            limit: limits.max_depth,
        });
    }
    Ok(depth)
}
