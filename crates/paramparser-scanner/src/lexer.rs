//! T-SQL lexer adapter.
//!
//! Tokenizes routine source with `sqlparser`'s `MsSqlDialect` tokenizer and
//! maps the result onto [`TokenKind`]. Token text is always the raw slice of
//! the source (quotes, `N` prefixes and comment markers included), recovered
//! from the token span.
//!
//! Lexing never fails outright: when the tokenizer rejects the input, the
//! tokens before the failure point are returned along with a diagnostic.

use crate::token::{Token, TokenKind};
use serde::Serialize;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::tokenizer::{
    Location, Span, Token as SqlToken, TokenWithSpan, Tokenizer, Whitespace, Word,
};
use tracing::debug;

/// T-SQL reserved keywords (sorted, for binary search).
///
/// Anything not listed here lexes as an identifier, which is why RETURNS,
/// OUTPUT and the type names show up as `TokenKind::Identifier`.
const RESERVED_KEYWORDS: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "ANY", "AS",
    "ASC", "AUTHORIZATION", "BACKUP", "BEGIN", "BETWEEN", "BREAK",
    "BROWSE", "BULK", "BY", "CASCADE", "CASE", "CHECK",
    "CHECKPOINT", "CLOSE", "CLUSTERED", "COALESCE", "COLLATE", "COLUMN",
    "COMMIT", "COMPUTE", "CONSTRAINT", "CONTAINS", "CONTAINSTABLE", "CONTINUE",
    "CONVERT", "CREATE", "CROSS", "CURRENT", "CURRENT_DATE", "CURRENT_TIME",
    "CURRENT_TIMESTAMP", "CURRENT_USER", "CURSOR", "DATABASE", "DBCC", "DEALLOCATE",
    "DECLARE", "DEFAULT", "DELETE", "DENY", "DESC", "DISK",
    "DISTINCT", "DISTRIBUTED", "DOUBLE", "DROP", "DUMP", "ELSE",
    "END", "ERRLVL", "ESCAPE", "EXCEPT", "EXEC", "EXECUTE",
    "EXISTS", "EXIT", "EXTERNAL", "FETCH", "FILE", "FILLFACTOR",
    "FOR", "FOREIGN", "FREETEXT", "FREETEXTTABLE", "FROM", "FULL",
    "FUNCTION", "GOTO", "GRANT", "GROUP", "HAVING", "HOLDLOCK",
    "IDENTITY", "IDENTITYCOL", "IDENTITY_INSERT", "IF", "IN", "INDEX",
    "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN",
    "KEY", "KILL", "LEFT", "LIKE", "LINENO", "LOAD",
    "MERGE", "NATIONAL", "NOCHECK", "NONCLUSTERED", "NOT", "NULL",
    "NULLIF", "OF", "OFF", "OFFSETS", "ON", "OPEN",
    "OPENDATASOURCE", "OPENQUERY", "OPENROWSET", "OPENXML", "OPTION", "OR",
    "ORDER", "OUTER", "OVER", "PERCENT", "PIVOT", "PLAN",
    "PRECISION", "PRIMARY", "PRINT", "PROC", "PROCEDURE", "PUBLIC",
    "RAISERROR", "READ", "READTEXT", "RECONFIGURE", "REFERENCES", "REPLICATION",
    "RESTORE", "RESTRICT", "RETURN", "REVERT", "REVOKE", "RIGHT",
    "ROLLBACK", "ROWCOUNT", "ROWGUIDCOL", "RULE", "SAVE", "SCHEMA",
    "SECURITYAUDIT", "SELECT", "SEMANTICKEYPHRASETABLE", "SEMANTICSIMILARITYDETAILSTABLE", "SEMANTICSIMILARITYTABLE", "SESSION_USER",
    "SET", "SETUSER", "SHUTDOWN", "SOME", "STATISTICS", "SYSTEM_USER",
    "TABLE", "TABLESAMPLE", "TEXTSIZE", "THEN", "TO", "TOP",
    "TRAN", "TRANSACTION", "TRIGGER", "TRUNCATE", "TRY_CONVERT", "TSEQUAL",
    "UNION", "UNIQUE", "UNPIVOT", "UPDATE", "UPDATETEXT", "USE",
    "USER", "VALUES", "VARYING", "VIEW", "WAITFOR", "WHEN",
    "WHERE", "WHILE", "WITH", "WRITETEXT",
];

/// A tokenizer complaint about the routine text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexDiagnostic {
    pub message: String,
    pub line: u64,
    pub column: u64,
}

/// Tokens of one routine plus whatever the tokenizer complained about.
#[derive(Debug, Clone, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<LexDiagnostic>,
}

impl LexOutput {
    pub fn is_partial(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Tokenize T-SQL source text.
pub fn lex(source: &str) -> LexOutput {
    let dialect = MsSqlDialect {};
    match Tokenizer::new(&dialect, source).tokenize_with_location() {
        Ok(raw) => LexOutput {
            tokens: convert_tokens(source, &raw),
            diagnostics: Vec::new(),
        },
        Err(e) => {
            let diagnostic = LexDiagnostic {
                message: e.message.clone(),
                line: e.location.line,
                column: e.location.column,
            };
            debug!(
                "Tokenizer failed at {}:{} ({}), retrying on prefix",
                diagnostic.line, diagnostic.column, diagnostic.message
            );

            let index = SourceIndex::new(source);
            let tokens = index
                .offset(e.location)
                .and_then(|end| source.get(..end))
                .filter(|prefix| !prefix.is_empty())
                .and_then(|prefix| {
                    Tokenizer::new(&dialect, prefix)
                        .tokenize_with_location()
                        .ok()
                        .map(|raw| convert_tokens(prefix, &raw))
                })
                .unwrap_or_default();

            LexOutput {
                tokens,
                diagnostics: vec![diagnostic],
            }
        }
    }
}

fn convert_tokens(source: &str, raw: &[TokenWithSpan]) -> Vec<Token> {
    let index = SourceIndex::new(source);
    let mut tokens = Vec::with_capacity(raw.len());
    let mut iter = raw.iter().peekable();

    while let Some(current) = iter.next() {
        if matches!(current.token, SqlToken::EOF) {
            continue;
        }

        // `$12.50` arrives as Placeholder("$12") + Number(".50")
        if is_money_head(&current.token) {
            if let Some(next) = iter.peek() {
                if is_fraction(&next.token) && next.span.start == current.span.end {
                    let span = Span::new(current.span.start, next.span.end);
                    let text = index
                        .slice(span)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("{}{}", current.token, next.token));
                    tokens.push(Token::new(TokenKind::Money, text));
                    iter.next();
                    continue;
                }
            }
        }

        let text = index
            .slice(current.span)
            .map(str::to_string)
            .unwrap_or_else(|| current.token.to_string());
        tokens.push(Token::new(kind_of(&current.token), text));
    }

    tokens
}

/// Map a tokenizer token onto our lexical categories.
pub fn kind_of(token: &SqlToken) -> TokenKind {
    match token {
        SqlToken::Word(word) => word_kind(word),
        SqlToken::Number(text, _) => number_kind(text),
        SqlToken::SingleQuotedString(_) => TokenKind::AsciiStringLiteral,
        SqlToken::NationalStringLiteral(_) => TokenKind::UnicodeStringLiteral,
        SqlToken::HexStringLiteral(_) => TokenKind::HexLiteral,
        SqlToken::Placeholder(p) if is_money_text(p) => TokenKind::Money,
        SqlToken::Whitespace(ws) => match ws {
            Whitespace::SingleLineComment { .. } => TokenKind::SingleLineComment,
            Whitespace::MultiLineComment(_) => TokenKind::MultilineComment,
            _ => TokenKind::WhiteSpace,
        },
        SqlToken::Eq => TokenKind::EqualsSign,
        SqlToken::LParen => TokenKind::LeftParenthesis,
        SqlToken::RParen => TokenKind::RightParenthesis,
        SqlToken::Comma => TokenKind::Comma,
        SqlToken::SemiColon => TokenKind::Semicolon,
        SqlToken::Period => TokenKind::Dot,
        SqlToken::DoubleEq
        | SqlToken::Neq
        | SqlToken::Lt
        | SqlToken::Gt
        | SqlToken::LtEq
        | SqlToken::GtEq
        | SqlToken::Plus
        | SqlToken::Minus
        | SqlToken::Mul
        | SqlToken::Div
        | SqlToken::Mod
        | SqlToken::Ampersand
        | SqlToken::Pipe
        | SqlToken::Caret
        | SqlToken::Tilde
        | SqlToken::ExclamationMark
        | SqlToken::StringConcat => TokenKind::Operator,
        _ => TokenKind::Unknown,
    }
}

fn word_kind(word: &Word) -> TokenKind {
    if word.quote_style.is_some() {
        return TokenKind::QuotedIdentifier;
    }
    // `@@SPID`, `@@ROWCOUNT` and friends are system functions, not variables
    if word.value.starts_with("@@") {
        return TokenKind::Identifier;
    }
    if word.value.starts_with('@') {
        return TokenKind::Variable;
    }

    let upper = word.value.to_ascii_uppercase();
    match upper.as_str() {
        "BEGIN" => TokenKind::Begin,
        "DECLARE" => TokenKind::Declare,
        "SELECT" => TokenKind::Select,
        "SET" => TokenKind::Set,
        "WITH" => TokenKind::With,
        "CREATE" => TokenKind::Create,
        "PROC" | "PROCEDURE" => TokenKind::Procedure,
        "FUNCTION" => TokenKind::Function,
        "AS" => TokenKind::As,
        "NULL" => TokenKind::Null,
        other if is_reserved_keyword(other) => TokenKind::Keyword,
        _ => TokenKind::Identifier,
    }
}

fn number_kind(text: &str) -> TokenKind {
    if text.bytes().all(|b| b.is_ascii_digit()) {
        TokenKind::Integer
    } else if text.contains(['e', 'E']) {
        TokenKind::Real
    } else {
        TokenKind::Numeric
    }
}

/// Case-sensitive lookup; callers pass upper-cased text.
pub fn is_reserved_keyword(upper: &str) -> bool {
    RESERVED_KEYWORDS.binary_search(&upper).is_ok()
}

fn is_money_text(text: &str) -> bool {
    text.strip_prefix('$')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn is_money_head(token: &SqlToken) -> bool {
    matches!(token, SqlToken::Placeholder(p) if is_money_text(p))
}

fn is_fraction(token: &SqlToken) -> bool {
    matches!(token, SqlToken::Number(text, _) if text.starts_with('.'))
}

/// Line/column to byte-offset translation for one source string.
///
/// Tokenizer locations are 1-based and count characters, not bytes.
pub(crate) struct SourceIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceIndex<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    pub(crate) fn offset(&self, location: Location) -> Option<usize> {
        if location.line == 0 {
            return None;
        }
        let line = usize::try_from(location.line).ok()? - 1;
        let line_start = *self.line_starts.get(line)?;
        let column = usize::try_from(location.column).ok()?.saturating_sub(1);

        match self.source[line_start..].char_indices().nth(column) {
            Some((i, _)) => Some(line_start + i),
            None => Some(self.source.len()),
        }
    }

    fn slice(&self, span: Span) -> Option<&'a str> {
        let start = self.offset(span.start)?;
        let end = self.offset(span.end)?;
        if start < end {
            self.source.get(start..end)
        } else {
            None
        }
    }
}
