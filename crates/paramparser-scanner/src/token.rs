//! Token model shared by the lexer adapter, the classifier and the scanner.
//!
//! `TokenKind` is the fixed set of lexical categories the rest of the crate
//! reasons about. The lexer maps everything it sees onto one of these, so the
//! classifier never has to know which tokenizer produced a stream.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Clause openers
    Begin,
    Declare,
    Select,
    Set,
    With,

    // Routine header structure
    Create,
    Procedure,
    Function,
    As,

    // Trivia
    WhiteSpace,
    SingleLineComment,
    MultilineComment,

    // Names
    Variable,
    Identifier,
    QuotedIdentifier,

    // Literals
    AsciiStringLiteral,
    UnicodeStringLiteral,
    Integer,
    Numeric,
    Real,
    Money,
    HexLiteral,
    Null,

    // Punctuation
    EqualsSign,
    LeftParenthesis,
    RightParenthesis,
    Comma,
    Semicolon,
    Dot,
    Operator,

    /// Reserved word without a dedicated kind (ALTER, RETURN, DEFAULT, ...)
    Keyword,
    Unknown,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Begin => "begin",
            TokenKind::Declare => "declare",
            TokenKind::Select => "select",
            TokenKind::Set => "set",
            TokenKind::With => "with",
            TokenKind::Create => "create",
            TokenKind::Procedure => "procedure",
            TokenKind::Function => "function",
            TokenKind::As => "as",
            TokenKind::WhiteSpace => "whitespace",
            TokenKind::SingleLineComment => "single_line_comment",
            TokenKind::MultilineComment => "multiline_comment",
            TokenKind::Variable => "variable",
            TokenKind::Identifier => "identifier",
            TokenKind::QuotedIdentifier => "quoted_identifier",
            TokenKind::AsciiStringLiteral => "ascii_string_literal",
            TokenKind::UnicodeStringLiteral => "unicode_string_literal",
            TokenKind::Integer => "integer",
            TokenKind::Numeric => "numeric",
            TokenKind::Real => "real",
            TokenKind::Money => "money",
            TokenKind::HexLiteral => "hex_literal",
            TokenKind::Null => "null",
            TokenKind::EqualsSign => "equals_sign",
            TokenKind::LeftParenthesis => "left_parenthesis",
            TokenKind::RightParenthesis => "right_parenthesis",
            TokenKind::Comma => "comma",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Dot => "dot",
            TokenKind::Operator => "operator",
            TokenKind::Keyword => "keyword",
            TokenKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified lexical unit: its kind plus the raw source text it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}
