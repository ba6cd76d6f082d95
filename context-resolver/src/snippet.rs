//! Source text of a resolved context, for prompt building.

use serde::{Deserialize, Serialize};

use crate::types::EnclosingContext;

/// A context paired with the source lines it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDescriptor {
    pub context: EnclosingContext,
    pub snippet: String,
}

impl ContextDescriptor {
    pub fn new(context: EnclosingContext, text: &str) -> Self {
        let snippet = context_snippet(text, &context);
        Self { context, snippet }
    }
}

/// Whole lines `start.line..=end.line` (1-based) of `text`.
///
/// Out-of-range spans are clamped; the result never panics on short input.
pub fn context_snippet(text: &str, ctx: &EnclosingContext) -> String {
    lines_between(text, ctx.span.start.line, ctx.span.end.line)
}

/// Lines `first..=last` (1-based, inclusive), joined with `\n`.
pub fn lines_between(text: &str, first: usize, last: usize) -> String {
    if first == 0 || last < first {
        return String::new();
    }
    text.lines()
        .skip(first - 1)
        .take(last - first + 1)
        .collect::<Vec<_>>()
        .join("\n")
}
