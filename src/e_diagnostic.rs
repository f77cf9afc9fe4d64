//! Serde model of the JSON diagnostics emitted by `rustc --error-format=json`
//! and of the `cargo --message-format=json` envelope that wraps them.
//!
//! Only the fields the annotation pipeline reads are modelled. Unknown fields
//! are ignored so newer compilers (and Prusti, which reuses the rustc format)
//! keep decoding.

use serde::Deserialize;

/// The `reason` carried by cargo envelopes that wrap a compiler diagnostic.
pub const COMPILER_MESSAGE_REASON: &str = "compiler-message";

/// An error code attached to a diagnostic, e.g. `E0308`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiagnosticCode {
    pub code: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A source location implicated by a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiagnosticSpan {
    /// Path as reported by the compiler (relative to its working directory).
    pub file_name: String,
    /// 1-based, inclusive.
    pub line_start: usize,
    pub line_end: usize,
    /// 1-based, character offset, inclusive.
    pub column_start: usize,
    pub column_end: usize,
    /// Set by the compiler on the span that best represents the cause.
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub label: Option<String>,
}

/// One structured compiler message with its nested sub-messages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Diagnostic {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<DiagnosticCode>,
    /// "error: internal compiler error", "error", "warning", "note", "help"
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub spans: Vec<DiagnosticSpan>,
    #[serde(default)]
    pub children: Vec<Diagnostic>,
    /// The message as rustc would render it.
    #[serde(default)]
    pub rendered: Option<String>,
}

/// A line of `cargo --message-format=json` output.
///
/// `message` stays untyped here: only `compiler-message` records carry a
/// diagnostic, and the other reasons use the same key for unrelated data.
#[derive(Debug, Clone, Deserialize)]
pub struct CargoEnvelope {
    pub reason: String,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

impl CargoEnvelope {
    pub fn is_compiler_message(&self) -> bool {
        self.reason == COMPILER_MESSAGE_REASON
    }
}

/// Spans of a diagnostic tree split by the primary flag, both in
/// pre-order (node spans first, then each child in turn).
#[derive(Debug, Default)]
pub struct CollectedSpans<'a> {
    pub primary: Vec<&'a DiagnosticSpan>,
    pub all: Vec<&'a DiagnosticSpan>,
}

impl Diagnostic {
    /// Walks this diagnostic and every descendant depth-first, recording spans
    /// in the order they are met.
    pub fn collect_spans(&self) -> CollectedSpans<'_> {
        let mut collected = CollectedSpans::default();
        // explicit stack instead of recursion; children pushed reversed to keep pre-order
        let mut stack: Vec<&Diagnostic> = vec![self];
        while let Some(node) = stack.pop() {
            for span in &node.spans {
                if span.is_primary {
                    collected.primary.push(span);
                }
                collected.all.push(span);
            }
            stack.extend(node.children.iter().rev());
        }
        collected
    }

    /// The span used to place an annotation: the first primary span in
    /// pre-order, else the first span of any kind.
    pub fn display_span(&self) -> Option<&DiagnosticSpan> {
        let collected = self.collect_spans();
        collected
            .primary
            .first()
            .or_else(|| collected.all.first())
            .copied()
    }
}
