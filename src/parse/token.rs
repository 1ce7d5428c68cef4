use std::fmt;

use winnow::combinator::{alt, cut_err};
use winnow::error::{ErrMode, ModalResult};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use super::error::{LexError, LexErrorKind};
use crate::{Connective, Literal};

/// A token with its byte offset in the rule string.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Subject field name.
    Identifier(String),
    /// Raw run of `<>=!` characters; validated by the parser.
    ComparisonOp(String),
    LogicalOp(Connective),
    Literal(Literal),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier '{name}'"),
            TokenKind::ComparisonOp(op) => write!(f, "operator '{op}'"),
            TokenKind::LogicalOp(c) => write!(f, "'{c}'"),
            TokenKind::Literal(lit) => write!(f, "literal {lit}"),
        }
    }
}

enum Lexeme<'i> {
    Quoted(String),
    Operator(&'i str),
    Word(&'i str),
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '!')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '+' | '@' | ':' | '/')
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

// -- Lexemes ----------------------------------------------------------------

fn quote_mark(input: &mut &str) -> ModalResult<char> {
    one_of(['\'', '"']).parse_next(input)
}

fn next_char(input: &mut &str) -> ModalResult<char> {
    any.parse_next(input)
}

fn quoted(input: &mut &str) -> ModalResult<String> {
    let quote = quote_mark(input)?;
    let mut s = String::new();
    loop {
        match cut_err(next_char).parse_next(input)? {
            c if c == quote => return Ok(s),
            '\\' => match cut_err(next_char).parse_next(input)? {
                'n' => s.push('\n'),
                't' => s.push('\t'),
                esc @ ('\\' | '\'' | '"') => s.push(esc),
                other => {
                    s.push('\\');
                    s.push(other);
                }
            },
            c => s.push(c),
        }
    }
}

fn operator<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_operator_char).parse_next(input)
}

fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_word_char).parse_next(input)
}

fn lexeme<'i>(input: &mut &'i str) -> ModalResult<Lexeme<'i>> {
    alt((
        quoted.map(Lexeme::Quoted),
        operator.map(Lexeme::Operator),
        word.map(Lexeme::Word),
    ))
    .parse_next(input)
}

// -- Classification ---------------------------------------------------------

/// A word becomes a number only when the number renders back to the same
/// text. Other spellings (`007`, `1e3`, `+5`) stay strings so a string field
/// compares against what was written; numeric fields still coerce them.
fn numeric(word: &str) -> Option<Literal> {
    if !word.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.')) {
        return None;
    }
    if let Ok(i) = word.parse::<i64>() {
        return (i.to_string() == word).then_some(Literal::Int(i));
    }
    word.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && format!("{f:?}") == word)
        .map(Literal::Float)
}

/// A bare word directly after a comparison operator is always a value, so
/// `department = Sales` compares against the string `Sales`.
fn classify(lexeme: Lexeme<'_>, after_operator: bool) -> TokenKind {
    match lexeme {
        Lexeme::Quoted(s) => TokenKind::Literal(Literal::String(s)),
        Lexeme::Operator(op) => TokenKind::ComparisonOp(op.to_owned()),
        Lexeme::Word(w) => {
            if let Some(connective) = Connective::from_keyword(w) {
                TokenKind::LogicalOp(connective)
            } else if let Some(number) = numeric(w) {
                TokenKind::Literal(number)
            } else if !after_operator && is_identifier(w) {
                TokenKind::Identifier(w.to_owned())
            } else {
                TokenKind::Literal(Literal::String(w.to_owned()))
            }
        }
    }
}

// -- Top-level tokenizer ----------------------------------------------------

/// Split a rule string into tokens. Whitespace separates tokens and is dropped.
///
/// # Errors
///
/// Returns [`LexError`] on a character that starts no token, or on an
/// unterminated quoted string.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut input = source;
    let mut tokens: Vec<Token> = Vec::new();

    loop {
        input = input.trim_start();
        let Some(first) = input.chars().next() else {
            break;
        };
        let position = source.len() - input.len();

        let lexeme = match lexeme.parse_next(&mut input) {
            Ok(lexeme) => lexeme,
            Err(ErrMode::Cut(_)) => {
                return Err(LexError::new(LexErrorKind::UnterminatedString, position));
            }
            Err(_) => {
                return Err(LexError::new(
                    LexErrorKind::UnrecognizedCharacter(first),
                    position,
                ));
            }
        };

        let after_operator = matches!(
            tokens.last(),
            Some(Token {
                kind: TokenKind::ComparisonOp(_),
                ..
            })
        );
        tokens.push(Token {
            kind: classify(lexeme, after_operator),
            position,
        });
    }

    Ok(tokens)
}
