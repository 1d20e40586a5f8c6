//! Token classification.
//!
//! Maps every `TokenKind` onto exactly one `TokenRole`. The common case is a
//! plain table lookup; the only text-sensitive rule is the `RETURNS` check,
//! kept in its own predicate because the lexer has no dedicated kind for it.

use crate::token::{Token, TokenKind};
use serde::Serialize;

/// Role a token plays for the parameter scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenRole {
    /// The parameter list has ended; nothing after this can declare a parameter
    Terminator,
    /// Skipped without touching scan state
    Ignorable,
    /// A parameter name (`@name`)
    ParameterMarker,
    /// Something that can stand as a default value
    LiteralCandidate,
    Other,
}

/// Kinds that only appear once the routine body has begun
pub const PARAMETER_LIST_END: &[TokenKind] = &[
    TokenKind::Begin,
    TokenKind::Declare,
    TokenKind::Select,
    TokenKind::Set,
    TokenKind::With,
];

/// Comments, whitespace and the header keywords around the parameter list
pub const IGNORABLE: &[TokenKind] = &[
    TokenKind::MultilineComment,
    TokenKind::SingleLineComment,
    TokenKind::WhiteSpace,
    TokenKind::As,
    TokenKind::Create,
    TokenKind::Procedure,
    TokenKind::Function,
];

/// Kinds accepted as a default value after `=`.
///
/// Identifiers are included so `= GETDATE()` or `= SomeConstant` still
/// records something (only the head token survives).
pub const DEFAULT_VALUE_KINDS: &[TokenKind] = &[
    TokenKind::AsciiStringLiteral,
    TokenKind::HexLiteral,
    TokenKind::Identifier,
    TokenKind::Integer,
    TokenKind::Money,
    TokenKind::Null,
    TokenKind::Numeric,
    TokenKind::Real,
    TokenKind::UnicodeStringLiteral,
];

/// Keyword that introduces a function's return type
const RETURN_TYPE_KEYWORD: &str = "RETURNS";

/// Classify a token kind, consulting `text` only for identifier tokens.
pub fn classify(kind: TokenKind, text: &str) -> TokenRole {
    if is_return_type_marker(kind, text) {
        return TokenRole::Terminator;
    }
    role_of(kind)
}

/// Convenience wrapper over [`classify`].
pub fn classify_token(token: &Token) -> TokenRole {
    classify(token.kind, &token.text)
}

/// Kind-only part of the classification.
pub fn role_of(kind: TokenKind) -> TokenRole {
    if PARAMETER_LIST_END.contains(&kind) {
        TokenRole::Terminator
    } else if IGNORABLE.contains(&kind) {
        TokenRole::Ignorable
    } else if kind == TokenKind::Variable {
        TokenRole::ParameterMarker
    } else if DEFAULT_VALUE_KINDS.contains(&kind) {
        TokenRole::LiteralCandidate
    } else {
        TokenRole::Other
    }
}

/// `RETURNS` arrives as a plain identifier, so it is recognised by text.
pub fn is_return_type_marker(kind: TokenKind, text: &str) -> bool {
    kind == TokenKind::Identifier && text.eq_ignore_ascii_case(RETURN_TYPE_KEYWORD)
}

/// The assignment operator that opens a default value.
pub fn is_assignment(kind: TokenKind) -> bool {
    kind == TokenKind::EqualsSign
}
