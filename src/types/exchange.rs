//! The JSON tree shape exchanged with rule stores and API layers.
//!
//! ```text
//! { "type": "operator",   "value": "AND" | "OR" | ">" | ">=" | "<" | "<=" | "=" | "!=", "left": .., "right": .. }
//! { "type": "identifier", "name": "age" }
//! { "type": "literal",    "value": 30 | "Sales" }
//! ```
//!
//! A comparison is an operator node whose left child is an identifier and
//! whose right child is a literal. A logical node is an `AND`/`OR` operator
//! node whose children are operator nodes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::node::{CompareOp, Connective, Identifier, Literal, Node};

/// One node of the exchange shape, exactly as it appears in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExchangeNode {
    Operator {
        value: String,
        left: Box<ExchangeNode>,
        right: Box<ExchangeNode>,
    },
    Identifier {
        name: String,
    },
    Literal {
        value: Literal,
    },
}

impl ExchangeNode {
    fn kind(&self) -> &'static str {
        match self {
            ExchangeNode::Operator { .. } => "operator",
            ExchangeNode::Identifier { .. } => "identifier",
            ExchangeNode::Literal { .. } => "literal",
        }
    }
}

/// Errors produced when external data does not fit the shapes the engine accepts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("unsupported operator '{value}'")]
    UnsupportedOperator { value: String },

    #[error("expected {expected}, found {found}")]
    UnexpectedNode {
        expected: &'static str,
        found: String,
    },

    #[error("field '{field}' holds unsupported {found} value; expected a string or number")]
    UnsupportedValue { field: String, found: &'static str },

    #[error("context must be a JSON object, found {found}")]
    ContextNotObject { found: &'static str },
}

impl From<Node> for ExchangeNode {
    fn from(node: Node) -> Self {
        match node {
            Node::Logical {
                connective,
                left,
                right,
            } => ExchangeNode::Operator {
                value: connective.keyword().to_owned(),
                left: Box::new(ExchangeNode::from(*left)),
                right: Box::new(ExchangeNode::from(*right)),
            },
            Node::Comparison {
                operator,
                field,
                literal,
            } => ExchangeNode::Operator {
                value: operator.symbol().to_owned(),
                left: Box::new(ExchangeNode::Identifier {
                    name: field.name().to_owned(),
                }),
                right: Box::new(ExchangeNode::Literal { value: literal }),
            },
        }
    }
}

impl TryFrom<&ExchangeNode> for Node {
    type Error = ShapeError;

    fn try_from(node: &ExchangeNode) -> Result<Self, Self::Error> {
        let ExchangeNode::Operator { value, left, right } = node else {
            return Err(ShapeError::UnexpectedNode {
                expected: "operator node",
                found: format!("{} node", node.kind()),
            });
        };

        if let Some(connective) = Connective::from_keyword(value) {
            return Ok(Node::logical(
                connective,
                Node::try_from(left.as_ref())?,
                Node::try_from(right.as_ref())?,
            ));
        }

        let operator = CompareOp::from_symbol(value).ok_or_else(|| ShapeError::UnsupportedOperator {
            value: value.clone(),
        })?;

        match (left.as_ref(), right.as_ref()) {
            (ExchangeNode::Identifier { name }, ExchangeNode::Literal { value }) => {
                Ok(Node::Comparison {
                    operator,
                    field: Identifier::new(name.as_str()),
                    literal: value.clone(),
                })
            }
            (l, r) => Err(ShapeError::UnexpectedNode {
                expected: "identifier and literal operands",
                found: format!("{} and {} nodes", l.kind(), r.kind()),
            }),
        }
    }
}

impl TryFrom<ExchangeNode> for Node {
    type Error = ShapeError;

    fn try_from(node: ExchangeNode) -> Result<Self, Self::Error> {
        Node::try_from(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;

    #[test]
    fn comparison_to_exchange() {
        let exchange = ExchangeNode::from(field("age").gt(30_i64));
        assert_eq!(
            exchange,
            ExchangeNode::Operator {
                value: ">".into(),
                left: Box::new(ExchangeNode::Identifier { name: "age".into() }),
                right: Box::new(ExchangeNode::Literal {
                    value: Literal::Int(30)
                }),
            }
        );
    }

    #[test]
    fn logical_round_trip() {
        let node = field("age").gt(30_i64).or(field("department").eq("Sales"));
        let exchange = ExchangeNode::from(node.clone());
        assert_eq!(Node::try_from(exchange).unwrap(), node);
    }

    #[test]
    fn lowercase_connective_accepted() {
        let exchange = ExchangeNode::Operator {
            value: "or".into(),
            left: Box::new(ExchangeNode::from(field("a").eq(1_i64))),
            right: Box::new(ExchangeNode::from(field("b").eq(2_i64))),
        };
        let node = Node::try_from(exchange).unwrap();
        assert!(matches!(
            node,
            Node::Logical {
                connective: Connective::Or,
                ..
            }
        ));
    }

    #[test]
    fn unsupported_operator_rejected() {
        let exchange = ExchangeNode::Operator {
            value: "==".into(),
            left: Box::new(ExchangeNode::Identifier { name: "a".into() }),
            right: Box::new(ExchangeNode::Literal {
                value: Literal::Int(1),
            }),
        };
        assert_eq!(
            Node::try_from(exchange),
            Err(ShapeError::UnsupportedOperator { value: "==".into() })
        );
    }

    #[test]
    fn standalone_identifier_rejected() {
        let exchange = ExchangeNode::Identifier { name: "age".into() };
        assert!(matches!(
            Node::try_from(exchange),
            Err(ShapeError::UnexpectedNode { .. })
        ));
    }

    #[test]
    fn swapped_operands_rejected() {
        let exchange = ExchangeNode::Operator {
            value: ">".into(),
            left: Box::new(ExchangeNode::Literal {
                value: Literal::Int(30),
            }),
            right: Box::new(ExchangeNode::Identifier { name: "age".into() }),
        };
        let err = Node::try_from(exchange).unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected identifier and literal operands, found literal and identifier nodes"
        );
    }

    #[test]
    fn logical_with_leaf_child_rejected() {
        let exchange = ExchangeNode::Operator {
            value: "AND".into(),
            left: Box::new(ExchangeNode::Identifier { name: "a".into() }),
            right: Box::new(ExchangeNode::from(field("b").eq(2_i64))),
        };
        assert!(matches!(
            Node::try_from(exchange),
            Err(ShapeError::UnexpectedNode { .. })
        ));
    }
}
