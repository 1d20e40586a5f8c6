// Script batch splitting and routine header detection

use super::RoutineKind;
use regex::Regex;
use std::sync::LazyLock;

/// `CREATE [OR ALTER] PROC|PROCEDURE|FUNCTION <name>`; group 1 is the kind, group 2 the name
static ROUTINE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:CREATE(?:\s+OR\s+ALTER)?|ALTER)\s+(PROCEDURE|PROC|FUNCTION)\s+((?:\[[^\]]+\]|[A-Za-z_#][\w@$#]*)(?:\s*\.\s*(?:\[[^\]]+\]|[A-Za-z_#][\w@$#]*))*)",
    )
    .unwrap()
});

static DOT_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\.\s*").unwrap());

/// Split a script into its `GO`-separated batches, dropping empty ones.
///
/// A separator is a line holding only `GO` (any case, surrounding blanks allowed).
pub fn split_batches(script: &str) -> Vec<&str> {
    let mut batches = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in script.split_inclusive('\n') {
        if line.trim().eq_ignore_ascii_case("GO") {
            batches.push(&script[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    batches.push(&script[start..]);

    batches.retain(|batch| !batch.trim().is_empty());
    batches
}

/// Kind and name of the procedure or function a batch defines, if it defines one.
pub fn routine_header(batch: &str) -> Option<(RoutineKind, String)> {
    let caps = ROUTINE_HEADER_RE.captures(batch)?;
    let kind = if caps[1].eq_ignore_ascii_case("FUNCTION") {
        RoutineKind::Function
    } else {
        RoutineKind::Procedure
    };
    let name = DOT_SPACING_RE.replace_all(&caps[2], ".").into_owned();
    Some((kind, name))
}

/// Name of the procedure or function a batch defines, if it defines one.
pub fn routine_name(batch: &str) -> Option<String> {
    routine_header(batch).map(|(_, name)| name)
}
