use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::exchange::ExchangeNode;

/// Comparison operators supported in rule expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Look up an operator by its rule-string symbol (`=`, `!=`, `>`, `>=`, `<`, `<=`).
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Neq),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Gte),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Lte),
            _ => None,
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }

    /// Apply the operator to two operands of the same type.
    pub fn apply<T: PartialOrd + ?Sized>(self, lhs: &T, rhs: &T) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Neq => lhs != rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Gte => lhs >= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Lte => lhs <= rhs,
        }
    }
}

/// Boolean connective joining two sub-expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    /// Case-insensitive keyword lookup (`AND`, `and`, `Or`, ...).
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        if keyword.eq_ignore_ascii_case("AND") {
            Some(Connective::And)
        } else if keyword.eq_ignore_ascii_case("OR") {
            Some(Connective::Or)
        } else {
            None
        }
    }

    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }

    #[must_use]
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            Connective::And => lhs && rhs,
            Connective::Or => lhs || rhs,
        }
    }
}

/// The subject field of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A literal operand: a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
}

impl Literal {
    /// The literal as text, used when the compared field holds a string.
    /// Floats keep their fractional part, so `2.0` reads as `"2.0"`.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Literal::Int(v) => Cow::Owned(v.to_string()),
            Literal::Float(v) => Cow::Owned(format!("{v:?}")),
            Literal::String(v) => Cow::Borrowed(v),
        }
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_owned())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

/// A parsed rule. Immutable once built; safe to share across threads.
///
/// `Node` serializes to and deserializes from the JSON exchange shape
/// described on [`ExchangeNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ExchangeNode", try_from = "ExchangeNode")]
pub enum Node {
    Logical {
        connective: Connective,
        left: Box<Node>,
        right: Box<Node>,
    },
    Comparison {
        operator: CompareOp,
        field: Identifier,
        literal: Literal,
    },
}

impl Node {
    #[must_use]
    pub fn logical(connective: Connective, left: Node, right: Node) -> Node {
        Node::Logical {
            connective,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn comparison(field: &str, operator: CompareOp, literal: impl Into<Literal>) -> Node {
        Node::Comparison {
            operator,
            field: Identifier::new(field),
            literal: literal.into(),
        }
    }

    #[must_use]
    pub fn and(self, other: Node) -> Node {
        Node::logical(Connective::And, self, other)
    }

    #[must_use]
    pub fn or(self, other: Node) -> Node {
        Node::logical(Connective::Or, self, other)
    }

    /// Height of the tree. A comparison has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Comparison { .. } => 1,
            Node::Logical { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of comparison leaves.
    #[must_use]
    pub fn comparisons(&self) -> usize {
        match self {
            Node::Comparison { .. } => 1,
            Node::Logical { left, right, .. } => left.comparisons() + right.comparisons(),
        }
    }

    /// Field names referenced by the rule, in tree order, without duplicates.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Node::Comparison { field, .. } => {
                if !out.contains(&field.name()) {
                    out.push(field.name());
                }
            }
            Node::Logical { left, right, .. } => {
                left.collect_fields(out);
                right.collect_fields(out);
            }
        }
    }
}

/// Intermediate builder for comparison nodes.
/// Created by [`field()`]; requires a comparison method to produce a [`Node`].
#[derive(Debug, Clone)]
pub struct FieldExpr {
    name: String,
}

impl FieldExpr {
    fn compare(self, operator: CompareOp, literal: impl Into<Literal>) -> Node {
        Node::Comparison {
            operator,
            field: Identifier::new(self.name),
            literal: literal.into(),
        }
    }

    #[must_use]
    pub fn eq(self, literal: impl Into<Literal>) -> Node {
        self.compare(CompareOp::Eq, literal)
    }

    #[must_use]
    pub fn neq(self, literal: impl Into<Literal>) -> Node {
        self.compare(CompareOp::Neq, literal)
    }

    #[must_use]
    pub fn gt(self, literal: impl Into<Literal>) -> Node {
        self.compare(CompareOp::Gt, literal)
    }

    #[must_use]
    pub fn gte(self, literal: impl Into<Literal>) -> Node {
        self.compare(CompareOp::Gte, literal)
    }

    #[must_use]
    pub fn lt(self, literal: impl Into<Literal>) -> Node {
        self.compare(CompareOp::Lt, literal)
    }

    #[must_use]
    pub fn lte(self, literal: impl Into<Literal>) -> Node {
        self.compare(CompareOp::Lte, literal)
    }
}

#[must_use]
pub fn field(name: &str) -> FieldExpr {
    FieldExpr {
        name: name.to_owned(),
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            // Debug keeps the decimal point so the text re-lexes as a float.
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::String(v) => {
                f.write_str("'")?;
                for c in v.chars() {
                    if c == '\'' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("'")
            }
        }
    }
}

/// Renders the rule as a rule string. Parser output always renders without
/// parentheses and re-parses to the same tree; combined trees that need
/// grouping are parenthesized.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Comparison {
                operator,
                field,
                literal,
            } => write!(f, "{field} {operator} {literal}"),
            Node::Logical {
                connective,
                left,
                right,
            } => {
                write_operand(f, left, *connective, false)?;
                write!(f, " {connective} ")?;
                write_operand(f, right, *connective, true)
            }
        }
    }
}

fn write_operand(
    f: &mut fmt::Formatter<'_>,
    node: &Node,
    parent: Connective,
    is_right: bool,
) -> fmt::Result {
    let grouped = match node {
        Node::Logical { connective, .. } => {
            (*connective == Connective::Or && parent == Connective::And)
                || (is_right && *connective == parent)
        }
        Node::Comparison { .. } => false,
    };
    if grouped {
        write!(f, "({node})")
    } else {
        write!(f, "{node}")
    }
}
