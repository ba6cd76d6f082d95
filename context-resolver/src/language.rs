//! Language taxonomy, grammar mapping and the definition-kind table.
//!
//! Each supported language contributes three things: the tags/extensions it
//! is selected by, the tree-sitter grammar that parses it, and the set of
//! grammar node kinds that count as a "definition" for context resolution.
//! Everything else (parsing, traversal, selection) is shared.

use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tree_sitter::Language;

use crate::errors::ContextError;
use crate::types::DefinitionKind;

/// Supported programming languages.
///
/// TypeScript and TSX are separate entries because they are separate grammars.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageKind {
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Rust,
}

impl Display for LanguageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageKind {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ContextError::UnsupportedLanguage(s.to_string()))
    }
}

impl LanguageKind {
    /// All languages in a stable order.
    pub const ALL: [LanguageKind; 5] = [
        LanguageKind::Python,
        LanguageKind::JavaScript,
        LanguageKind::TypeScript,
        LanguageKind::Tsx,
        LanguageKind::Rust,
    ];

    /// Canonical lowercase tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageKind::Python => "python",
            LanguageKind::JavaScript => "javascript",
            LanguageKind::TypeScript => "typescript",
            LanguageKind::Tsx => "tsx",
            LanguageKind::Rust => "rust",
        }
    }

    /// Resolve an explicit language tag (case-insensitive). Short forms
    /// that double as file extensions are accepted too.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Some(Self::Python),
            "javascript" | "js" => Some(Self::JavaScript),
            "typescript" | "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "rust" | "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    /// Detection by file extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "py" | "pyi" => Some(Self::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    /// Detection by the extension of `path`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// Tree-sitter grammar for this language.
    pub fn grammar(&self) -> Language {
        match self {
            LanguageKind::Python => tree_sitter_python::LANGUAGE.into(),
            LanguageKind::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            LanguageKind::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            LanguageKind::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            LanguageKind::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }

    /// Definition-kind predicate: maps a grammar node kind to the
    /// normalized [`DefinitionKind`] it stands for, or `None` for every
    /// node kind that is not a definition in this language.
    pub fn definition_kind(&self, node_kind: &str) -> Option<DefinitionKind> {
        match self {
            LanguageKind::Python => python_definition(node_kind),
            LanguageKind::JavaScript => ecmascript_definition(node_kind),
            LanguageKind::TypeScript | LanguageKind::Tsx => {
                typescript_definition(node_kind).or_else(|| ecmascript_definition(node_kind))
            }
            LanguageKind::Rust => rust_definition(node_kind),
        }
    }
}

fn python_definition(node_kind: &str) -> Option<DefinitionKind> {
    match node_kind {
        "function_definition" => Some(DefinitionKind::FunctionDefinition),
        "class_definition" => Some(DefinitionKind::ClassDefinition),
        _ => None,
    }
}

fn ecmascript_definition(node_kind: &str) -> Option<DefinitionKind> {
    match node_kind {
        "function_declaration" | "generator_function_declaration" => {
            Some(DefinitionKind::FunctionDefinition)
        }
        "class_declaration" => Some(DefinitionKind::ClassDefinition),
        "method_definition" => Some(DefinitionKind::MethodDefinition),
        _ => None,
    }
}

fn typescript_definition(node_kind: &str) -> Option<DefinitionKind> {
    match node_kind {
        "abstract_class_declaration" => Some(DefinitionKind::ClassDefinition),
        "interface_declaration" => Some(DefinitionKind::InterfaceDefinition),
        _ => None,
    }
}

fn rust_definition(node_kind: &str) -> Option<DefinitionKind> {
    match node_kind {
        "function_item" => Some(DefinitionKind::FunctionDefinition),
        "struct_item" | "enum_item" => Some(DefinitionKind::ClassDefinition),
        "impl_item" => Some(DefinitionKind::ImplDefinition),
        "trait_item" => Some(DefinitionKind::InterfaceDefinition),
        _ => None,
    }
}
