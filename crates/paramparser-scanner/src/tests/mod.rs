//! Tests for paramparser-scanner
//!
//! Organized by pipeline stage.


use crate::token::{Token, TokenKind};

/// Shorthand for building hand-written token streams
pub fn tok(kind: TokenKind, text: &str) -> Token {
    Token::new(kind, text)
}

pub fn ws() -> Token {
    Token::new(TokenKind::WhiteSpace, " ")
}
