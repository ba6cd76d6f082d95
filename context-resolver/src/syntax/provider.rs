//! Tree-sitter backed syntax tree provider, one per language.
//!
//! Responsibilities:
//! - Load the grammar once, at construction, so a broken grammar fails
//!   immediately instead of on the first request;
//! - Parse text into an immutable [`SyntaxTree`].
//!
//! Notes:
//! - The provider holds only the immutable `Language`. Every `parse` call
//!   builds its own `Parser`, so concurrent parses never share cursor state.
//! - Malformed source is not a failure: the grammar embeds `ERROR`/`MISSING`
//!   nodes and still returns a tree.

use tracing::debug;
use tree_sitter::{Language, Node, Parser, Tree};

use crate::errors::{ContextError, Result};
use crate::language::LanguageKind;

/// Parses text for a single language.
#[derive(Clone)]
pub struct SyntaxTreeProvider {
    language: LanguageKind,
    grammar: Language,
}

impl std::fmt::Debug for SyntaxTreeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTreeProvider")
            .field("language", &self.language)
            .field("abi_version", &self.grammar.abi_version())
            .finish()
    }
}

impl SyntaxTreeProvider {
    /// Load the grammar for `language`.
    ///
    /// Errors:
    /// - `ContextError::Grammar` if the grammar is rejected by the runtime
    ///   (e.g. incompatible ABI version).
    pub fn new(language: LanguageKind) -> Result<Self> {
        let grammar = language.grammar();
        Parser::new()
            .set_language(&grammar)
            .map_err(|e| ContextError::Grammar {
                language,
                reason: e.to_string(),
            })?;
        debug!(
            "provider ready: language={} abi={}",
            language,
            grammar.abi_version()
        );
        Ok(Self { language, grammar })
    }

    pub fn language(&self) -> LanguageKind {
        self.language
    }

    /// Parse `text` into a tree. Never mutates `text`.
    ///
    /// Errors:
    /// - `ContextError::ParseFailure` if the language cannot be set or the
    ///   parser returns no tree. Neither happens for malformed source.
    #[tracing::instrument(level = "debug", skip_all, fields(language = %self.language, bytes = text.len()))]
    pub fn parse(&self, text: &str) -> Result<SyntaxTree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar)
            .map_err(|e| ContextError::ParseFailure {
                language: self.language,
                reason: e.to_string(),
            })?;
        let tree = parser
            .parse(text, None)
            .ok_or_else(|| ContextError::ParseFailure {
                language: self.language,
                reason: "parser returned no tree".to_string(),
            })?;
        Ok(SyntaxTree {
            language: self.language,
            tree,
        })
    }
}

/// A parsed, immutable concrete syntax tree.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    language: LanguageKind,
    tree: Tree,
}

impl SyntaxTree {
    pub fn language(&self) -> LanguageKind {
        self.language
    }

    /// Root node; borrow lives as long as the tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Underlying tree-sitter tree.
    pub fn inner(&self) -> &Tree {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_loads() {
        for lang in LanguageKind::ALL {
            let p = SyntaxTreeProvider::new(lang).expect("grammar should load");
            assert_eq!(p.language(), lang);
        }
    }

    #[test]
    fn malformed_source_still_yields_a_tree() {
        let p = SyntaxTreeProvider::new(LanguageKind::Python).unwrap();
        let tree = p.parse("def broken(:\n    pass\n").expect("tree");
        assert!(tree.root().has_error());
    }

    #[test]
    fn clean_source_has_no_errors() {
        let p = SyntaxTreeProvider::new(LanguageKind::Rust).unwrap();
        let tree = p.parse("fn main() {\n    let x = 1;\n}\n").unwrap();
        assert_eq!(tree.root().kind(), "source_file");
        assert!(!tree.root().has_error());
    }
}
