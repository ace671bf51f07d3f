//! Lexer for documented source files
//!
//! The lexer converts source code into a stream of tokens. Whitespace and
//! comments never become tokens: the documentation extractor finds comment
//! lines by scanning the stretches of text *between* tokens.

#![allow(clippy::cast_possible_truncation)] // Spans are u32; source files over 4GB are unsupported

mod span;
mod token;

pub use span::{LineIndex, Location, Span};
pub use token::TokenKind;

use logos::Logos;
use thiserror::Error;

/// A token with its kind, span, and source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source code
    pub span: Span,
    /// The source text of the token
    pub lexeme: String,
}

impl Token {
    /// Create a new token
    #[must_use]
    pub fn new(kind: TokenKind, span: Span, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            lexeme: lexeme.into(),
        }
    }
}

/// Lexer error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
}

/// A lexer error with location information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedError {
    pub error: LexError,
    pub span: Span,
}

impl SpannedError {
    #[must_use]
    pub fn new(error: LexError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for SpannedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.span)
    }
}

impl std::error::Error for SpannedError {}

/// Tokenizer over a single source file
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, TokenKind>,
    errors: Vec<SpannedError>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code
    #[must_use]
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, returning all tokens and any errors
    ///
    /// Invalid characters produce a [`TokenKind::Error`] token so that the
    /// token stream still covers every non-trivia byte of the input.
    #[must_use]
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<SpannedError>) {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.by_ref().collect();
        (tokens, lexer.errors)
    }

    /// Errors collected so far
    #[must_use]
    pub fn errors(&self) -> &[SpannedError] {
        &self.errors
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let result = self.inner.next()?;
        let span = Span::from_range(self.inner.span());
        let lexeme = self.inner.slice();
        match result {
            Ok(kind) => Some(Token::new(kind, span, lexeme)),
            Err(()) => {
                let invalid = lexeme.chars().next().unwrap_or('\u{fffd}');
                self.errors.push(SpannedError::new(LexError::UnexpectedChar(invalid), span));
                Some(Token::new(TokenKind::Error, span, lexeme))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_comments_are_trivia() {
        let source = "/// Doc.\n// plain\n/* block */ let x = 5";
        assert_eq!(
            kinds(source),
            vec![TokenKind::Let, TokenKind::Ident, TokenKind::Eq, TokenKind::Int]
        );
    }

    #[test]
    fn test_spans_point_into_source() {
        let source = "/// Doc.\npublic fun f() {}";
        let (tokens, errors) = Lexer::tokenize(source);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Public);
        assert_eq!(tokens[0].span, Span::new(9, 15));
        assert_eq!(tokens[0].span.text(source), Some("public"));
    }

    #[test]
    fn test_string_hides_comment_marker() {
        let (tokens, _) = Lexer::tokenize(r#"let s = "/// not a comment""#);
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3].kind, TokenKind::StringLit);
    }

    #[test]
    fn test_invalid_character_reported() {
        let (tokens, errors) = Lexer::tokenize("let $ = 1");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, LexError::UnexpectedChar('$'));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
    }
}
