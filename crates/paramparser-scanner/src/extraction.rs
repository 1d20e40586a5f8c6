//! One-call extraction: lex a routine definition and scan its header.

use crate::lexer::{LexDiagnostic, lex};
use crate::scanner::{ObjectId, ParameterRecord, StopReason, scan_with_outcome};
use tracing::debug;

/// Parameters of one routine plus any lexer diagnostics.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub object_id: ObjectId,
    pub records: Vec<ParameterRecord>,
    pub diagnostics: Vec<LexDiagnostic>,
    pub stop: StopReason,
}

/// Extract declared parameters and default literals from a routine definition.
///
/// A definition the tokenizer rejects is scanned best-effort on the tokens
/// that precede the failure; see [`Extraction::diagnostics`].
pub fn extract_parameters(object_id: ObjectId, definition: &str) -> Extraction {
    let lexed = lex(definition);
    let outcome = scan_with_outcome(object_id, &lexed.tokens);

    if lexed.is_partial() {
        debug!(
            "Object {} scanned on a partial token stream ({} tokens)",
            object_id,
            lexed.tokens.len()
        );
    }

    Extraction {
        object_id,
        records: outcome.records,
        diagnostics: lexed.diagnostics,
        stop: outcome.stop,
    }
}
