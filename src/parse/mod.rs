//! Rule-string tokenizer and parser.

mod error;
mod parser;
mod token;

pub use error::{LexError, LexErrorKind, ParseError, ParseErrorKind, SyntaxError};
pub use token::{tokenize, Token, TokenKind};

use crate::{Limits, Node};

/// Parse a rule string into a [`Node`] using the default [`Limits`].
///
/// ```
/// use rulekit::{field, parse};
///
/// let node = parse("age > 30 AND department = 'Sales'").unwrap();
/// assert_eq!(node, field("age").gt(30_i64).and(field("department").eq("Sales")));
/// ```
///
/// # Errors
///
/// Returns [`SyntaxError::Lex`] if the input contains a character that starts
/// no token, and [`SyntaxError::Parse`] if the tokens violate the grammar or
/// the tree exceeds the depth limit.
pub fn parse(input: &str) -> Result<Node, SyntaxError> {
    parse_with(input, Limits::default())
}

/// Parse a rule string with explicit [`Limits`].
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with(input: &str, limits: Limits) -> Result<Node, SyntaxError> {
    let tokens = tokenize(input)?;
    let node = parser::Parser::new(&tokens, input.len(), limits).parse()?;
    tracing::debug!(
        tokens = tokens.len(),
        comparisons = node.comparisons(),
        depth = node.depth(),
        "parsed rule"
    );
    Ok(node)
}
