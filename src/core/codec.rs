//! i3status-rust custom block payloads.
//!
//! The status file holds a single JSON object of the form
//! `{"state": "<severity>", "text": "<display text>"}`. Each canonical state
//! has a fixed template whose only variable part is the detail. The glyph
//! escapes (`\uf023`, ...) are written verbatim and resolved by the bar's
//! icon font.
//!
//! Decoding only recovers the state. The detail is not reconstructed.

use std::fmt;

use serde::Deserialize;

use crate::state::{CanonicalState, StatusRecord};

/// Renderer-facing level, one per canonical state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Severity {
    Warning,
    Good,
    Info,
    Critical,
}

impl From<CanonicalState> for Severity {
    fn from(state: CanonicalState) -> Self {
        match state {
            CanonicalState::Working => Self::Warning,
            CanonicalState::Connected => Self::Good,
            CanonicalState::Disconnected => Self::Info,
            CanonicalState::Error => Self::Critical,
        }
    }
}

impl From<Severity> for CanonicalState {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Warning => Self::Working,
            Severity::Good => Self::Connected,
            Severity::Info => Self::Disconnected,
            Severity::Critical => Self::Error,
        }
    }
}

/// Text around the detail slot for each state: `(prefix, suffix)`.
const fn template(state: CanonicalState) -> (&'static str, &'static str) {
    match state {
        CanonicalState::Working => (
            "{\"state\": \"Warning\", \"text\": \"\\uf2f1 ",
            "\\uf023\"}",
        ),
        CanonicalState::Connected => ("{\"state\": \"Good\", \"text\": \"", " \\uf023\"}"),
        CanonicalState::Disconnected => ("{\"state\": \"Info\", \"text\": \"", "\\uf09c\"}"),
        CanonicalState::Error => (
            "{\"state\": \"Critical\", \"text\": \"\\uf071 ",
            " \\uf09c\"}",
        ),
    }
}

/// Renders a record into the status file payload.
pub fn encode(record: &StatusRecord) -> String {
    let (prefix, suffix) = template(record.state);
    let detail = escape_detail(&record.detail);

    let mut out = String::with_capacity(prefix.len() + detail.len() + suffix.len());
    out.push_str(prefix);
    out.push_str(&detail);
    out.push_str(suffix);
    out
}

/// Recovers the canonical state from a status file payload.
///
/// # Errors
///
/// Returns an error if the payload is not a JSON object with a known `state`.
pub fn decode(bytes: &[u8]) -> Result<CanonicalState, DecodeError> {
    let block: Block = serde_json::from_slice(bytes).map_err(DecodeError)?;
    Ok(block.state.into())
}

#[derive(Deserialize)]
struct Block {
    state: Severity,
}

/// JSON string escaping without the surrounding quotes.
fn escape_detail(detail: &str) -> String {
    let quoted = serde_json::Value::String(detail.to_owned()).to_string();
    quoted[1..quoted.len() - 1].to_owned()
}

/// The payload could not be decoded.
#[derive(Debug)]
pub struct DecodeError(serde_json::Error);

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid status payload: {}", self.0)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}
