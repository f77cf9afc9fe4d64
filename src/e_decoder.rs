//! Line decoder: one JSON object per line in, zero or one diagnostic out.
//!
//! The stream coming back from the compiler is mixed content, so every
//! failure here is a skip, never an error.

use crate::e_config::TargetMode;
use crate::e_diagnostic::{CargoEnvelope, Diagnostic};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// How a line has to be unwrapped before it is a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeMode {
    /// `rustc --error-format=json`: the line is the diagnostic.
    Direct,
    /// `cargo --message-format=json`: the diagnostic sits under `message`
    /// of a `compiler-message` record.
    Wrapped,
}

impl EnvelopeMode {
    /// Single files go through rustc, projects through cargo.
    pub fn for_target(mode: TargetMode) -> Self {
        match mode {
            TargetMode::SingleFile => EnvelopeMode::Direct,
            TargetMode::Project => EnvelopeMode::Wrapped,
        }
    }
}

/// Decodes one raw output line.
pub fn decode(line: &str, mode: EnvelopeMode) -> Option<Diagnostic> {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(_) => {
            // plain text interleaved with the json stream
            return None;
        }
    };
    if !value.is_object() {
        debug!("skipping non-object json line: {}", line);
        return None;
    }

    let diagnostic_value = match mode {
        EnvelopeMode::Direct => value,
        EnvelopeMode::Wrapped => unwrap_envelope(value)?,
    };

    match Diagnostic::deserialize(diagnostic_value) {
        Ok(diagnostic) => Some(diagnostic),
        Err(e) => {
            debug!("skipping line that is not a diagnostic ({}): {}", e, line);
            None
        }
    }
}

fn unwrap_envelope(value: Value) -> Option<Value> {
    let envelope = match CargoEnvelope::deserialize(value) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!("skipping malformed cargo message: {}", e);
            return None;
        }
    };
    if !envelope.is_compiler_message() {
        return None;
    }
    match envelope.message {
        Some(message) if message.is_object() => Some(message),
        _ => {
            debug!("compiler-message without a diagnostic object");
            None
        }
    }
}

/// Decodes a whole stream lazily, in input order.
pub fn decode_lines<'a, I>(lines: I, mode: EnvelopeMode) -> impl Iterator<Item = Diagnostic> + 'a
where
    I: IntoIterator + 'a,
    I::Item: AsRef<str>,
    I::IntoIter: 'a,
{
    lines
        .into_iter()
        .filter_map(move |line| decode(line.as_ref(), mode))
}
