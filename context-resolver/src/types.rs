use serde::{Deserialize, Serialize};

//
// ──────────────────────────────────────────────────────────────────────────
//  Resolver output
// ──────────────────────────────────────────────────────────────────────────
//

/// Normalized definition taxonomy shared by all languages.
///
/// Every language maps at least functions and classes; the rest are only
/// produced by languages whose grammar has a matching production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    FunctionDefinition,
    ClassDefinition,
    MethodDefinition,
    InterfaceDefinition,
    ImplDefinition,
}

/// A caller-facing position: 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

/// Inclusive line/column range of a definition in caller coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineColumnRange {
    pub start: LineColumn,
    pub end: LineColumn,
}

impl LineColumnRange {
    /// Lines spanned (inclusive).
    pub fn line_count(&self) -> usize {
        if self.end.line >= self.start.line {
            self.end.line - self.start.line + 1
        } else {
            0
        }
    }
}

/// The definition selected as containing a queried line range.
///
/// Built fresh per query and never cached: the same path may carry a
/// different text on the next call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnclosingContext {
    /// Normalized definition kind.
    pub kind: DefinitionKind,
    /// Raw grammar node kind (e.g. `function_definition`).
    pub node_kind: String,
    /// Definition span, 1-based lines.
    pub span: LineColumnRange,
}

//
// ──────────────────────────────────────────────────────────────────────────
//  Validity
// ──────────────────────────────────────────────────────────────────────────
//

/// Outcome of a syntax validity check. `valid: false` is a normal result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityResult {
    pub valid: bool,
    /// Empty when valid.
    pub diagnostic: String,
}

impl ValidityResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            diagnostic: String::new(),
        }
    }

    pub fn invalid(diagnostic: impl Into<String>) -> Self {
        Self {
            valid: false,
            diagnostic: diagnostic.into(),
        }
    }
}
