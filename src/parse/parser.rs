use super::error::{ParseError, ParseErrorKind};
use super::token::{Token, TokenKind};
use crate::{CompareOp, Connective, Identifier, Limits, Node};

/// Recursive-descent parser over a token slice.
///
/// ```text
/// Expr       := OrExpr
/// OrExpr     := AndExpr ( "OR" AndExpr )*
/// AndExpr    := Comparison ( "AND" Comparison )*
/// Comparison := Identifier CompOp Literal
/// ```
///
/// Each production returns the node together with its depth so chains can be
/// checked against [`Limits::max_depth`] as they fold.
pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    cursor: usize,
    /// Byte length of the source, reported as the position of end-of-input errors.
    end: usize,
    limits: Limits,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t [Token], end: usize, limits: Limits) -> Self {
        Self {
            tokens,
            cursor: 0,
            end,
            limits,
        }
    }

    pub(crate) fn parse(mut self) -> Result<Node, ParseError> {
        let (node, _) = self.or_expr()?;
        match self.peek() {
            None => Ok(node),
            Some(token) => Err(unexpected("AND or OR", token)),
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.cursor)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    /// Consume the next token if it is `connective`, returning its position.
    fn eat_connective(&mut self, connective: Connective) -> Option<usize> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::LogicalOp(c),
                position,
            }) if *c == connective => {
                self.cursor += 1;
                Some(*position)
            }
            _ => None,
        }
    }

    fn check_depth(&self, depth: usize, position: usize) -> Result<(), ParseError> {
        if depth > self.limits.max_depth {
            return Err(ParseError::new(
                ParseErrorKind::TooDeep {
                    limit: self.limits.max_depth,
                },
                position,
            ));
        }
        Ok(())
    }

    fn or_expr(&mut self) -> Result<(Node, usize), ParseError> {
        let (mut node, mut depth) = self.and_expr()?;
        while let Some(position) = self.eat_connective(Connective::Or) {
            let (rhs, rhs_depth) = self.and_expr()?;
            depth = 1 + depth.max(rhs_depth);
            self.check_depth(depth, position)?;
            node = Node::logical(Connective::Or, node, rhs);
        }
        Ok((node, depth))
    }

    fn and_expr(&mut self) -> Result<(Node, usize), ParseError> {
        let (mut node, mut depth) = self.comparison()?;
        while let Some(position) = self.eat_connective(Connective::And) {
            let (rhs, rhs_depth) = self.comparison()?;
            depth = 1 + depth.max(rhs_depth);
            self.check_depth(depth, position)?;
            node = Node::logical(Connective::And, node, rhs);
        }
        Ok((node, depth))
    }

    fn comparison(&mut self) -> Result<(Node, usize), ParseError> {
        let field = match self.next() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                ..
            }) => Identifier::new(name.as_str()),
            Some(Token {
                kind: TokenKind::LogicalOp(_),
                position,
            }) => return Err(ParseError::new(ParseErrorKind::MissingOperand, *position)),
            Some(token) => return Err(unexpected("field name", token)),
            None => return Err(self.missing_operand()),
        };

        let (operator, position) = match self.next() {
            Some(Token {
                kind: TokenKind::ComparisonOp(symbol),
                position,
            }) => {
                let op = CompareOp::from_symbol(symbol).ok_or_else(|| {
                    ParseError::new(ParseErrorKind::UnknownOperator(symbol.clone()), *position)
                })?;
                (op, *position)
            }
            Some(token) => return Err(unexpected("comparison operator", token)),
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken {
                        expected: "comparison operator",
                        found: "end of input".to_owned(),
                    },
                    self.end,
                ));
            }
        };

        let literal = match self.next() {
            Some(Token {
                kind: TokenKind::Literal(literal),
                ..
            }) => literal.clone(),
            Some(Token {
                kind: TokenKind::LogicalOp(_),
                position,
            }) => return Err(ParseError::new(ParseErrorKind::MissingOperand, *position)),
            Some(token) => return Err(unexpected("value", token)),
            None => return Err(self.missing_operand()),
        };

        self.check_depth(1, position)?;
        Ok((
            Node::Comparison {
                operator,
                field,
                literal,
            },
            1,
        ))
    }

    fn missing_operand(&self) -> ParseError {
        ParseError::new(ParseErrorKind::MissingOperand, self.end)
    }
}

fn unexpected(expected: &'static str, token: &Token) -> ParseError {
    ParseError::new(
        ParseErrorKind::UnexpectedToken {
            expected,
            found: token.kind.to_string(),
        },
        token.position,
    )
}
