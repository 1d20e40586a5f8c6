//! Parameter scanner.
//!
//! Walks one routine's token stream left to right and pairs every `@name`
//! in the header with at most one default literal. The pass stops at the
//! first terminator (BEGIN, DECLARE, SELECT, SET, WITH or RETURNS).
//!
//! All mutable state lives in a `ScanState` created for the routine being
//! scanned, so scans of different routines never share anything.

use crate::classifier::{TokenRole, classify_token, is_assignment};
use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Opaque, stable identifier of a routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub i64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ObjectId {
    fn from(value: i64) -> Self {
        ObjectId(value)
    }
}

/// One declared parameter of a routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub object_id: ObjectId,
    /// Parameter name including the `@` sigil
    pub name: String,
    /// Raw default literal text, empty when no default was found
    pub default_value: String,
}

impl ParameterRecord {
    pub fn has_default(&self) -> bool {
        !self.default_value.is_empty()
    }
}

/// How a scan pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A terminator token at `index` closed the parameter list
    Terminator { index: usize, text: String },
    EndOfStream,
}

/// Result of scanning one routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub records: Vec<ParameterRecord>,
    pub stop: StopReason,
}

/// Per-routine scan state.
#[derive(Debug, Default)]
pub struct ScanState {
    current_parameter: String,
    awaiting_default: bool,
    current_default: String,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_parameter(&self) -> Option<&str> {
        if self.current_parameter.is_empty() {
            None
        } else {
            Some(&self.current_parameter)
        }
    }

    pub fn is_awaiting_default(&self) -> bool {
        self.awaiting_default
    }

    /// Start a new parameter, handing back the previous one if there was one.
    fn begin_parameter(&mut self, name: &str) -> Option<(String, String)> {
        let previous = self.take_pending();
        self.current_parameter = name.to_string();
        previous
    }

    fn record_default(&mut self, literal: &str) {
        if self.awaiting_default {
            // Later candidates overwrite earlier ones
            self.current_default = literal.to_string();
        }
    }

    /// Drain the pending parameter and its default, resetting the state.
    fn take_pending(&mut self) -> Option<(String, String)> {
        self.awaiting_default = false;
        let default_value = std::mem::take(&mut self.current_default);
        if self.current_parameter.is_empty() {
            return None;
        }
        Some((std::mem::take(&mut self.current_parameter), default_value))
    }
}

/// Scan a routine's tokens and return its parameter records in order.
pub fn scan(object_id: ObjectId, tokens: &[Token]) -> Vec<ParameterRecord> {
    scan_with_outcome(object_id, tokens).records
}

/// Same as [`scan`], also reporting where the pass stopped.
pub fn scan_with_outcome(object_id: ObjectId, tokens: &[Token]) -> ScanOutcome {
    let mut state = ScanState::new();
    let mut records = Vec::new();
    let mut stop = StopReason::EndOfStream;

    let emit = |pending: Option<(String, String)>, records: &mut Vec<ParameterRecord>| {
        if let Some((name, default_value)) = pending {
            records.push(ParameterRecord {
                object_id,
                name,
                default_value,
            });
        }
    };

    for (index, token) in tokens.iter().enumerate() {
        match classify_token(token) {
            TokenRole::Terminator => {
                stop = StopReason::Terminator {
                    index,
                    text: token.text.clone(),
                };
                break;
            }
            TokenRole::Ignorable => {}
            TokenRole::ParameterMarker => {
                let previous = state.begin_parameter(&token.text);
                emit(previous, &mut records);
            }
            TokenRole::LiteralCandidate => state.record_default(&token.text),
            TokenRole::Other => {
                if is_assignment(token.kind) {
                    state.awaiting_default = true;
                }
            }
        }
    }

    emit(state.take_pending(), &mut records);

    trace!(
        "Scanned object {}: {} parameters, stop={:?}",
        object_id,
        records.len(),
        stop
    );

    ScanOutcome { records, stop }
}
