use thiserror::Error;

/// A character the tokenizer could not start a token with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lex error at position {position}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Byte offset into the rule string.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unrecognized character '{0}'")]
    UnrecognizedCharacter(char),

    #[error("unterminated string literal")]
    UnterminatedString,
}

impl LexError {
    pub(crate) fn new(kind: LexErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// A grammar violation found by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at position {position}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into the rule string.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[error("missing operand")]
    MissingOperand,

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("rule nesting exceeds the maximum depth of {limit}")]
    TooDeep { limit: usize },
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// Either failure `parse` can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    /// Byte offset of the offending input.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            SyntaxError::Lex(e) => e.position,
            SyntaxError::Parse(e) => e.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = LexError::new(LexErrorKind::UnrecognizedCharacter('$'), 4);
        assert_eq!(
            err.to_string(),
            "lex error at position 4: unrecognized character '$'"
        );
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::new(ParseErrorKind::UnknownOperator("><".into()), 4);
        assert_eq!(
            err.to_string(),
            "parse error at position 4: unknown operator '><'"
        );
    }

    #[test]
    fn syntax_error_is_transparent() {
        let err = SyntaxError::from(ParseError::new(ParseErrorKind::MissingOperand, 9));
        assert_eq!(err.to_string(), "parse error at position 9: missing operand");
        assert_eq!(err.position(), 9);
    }
}
