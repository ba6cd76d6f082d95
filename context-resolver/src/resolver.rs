//! Enclosing-definition selection.
//!
//! Walks every node, keeps the definition nodes whose rows contain the
//! queried interval and selects the one with the largest row span. Nested
//! definitions (a method inside a class) are both containers; the outermost
//! wins so the reviewer sees the whole unit. On equal spans the first node in
//! document order is kept.
//!
//! All rows are 0-based here.

use std::ops::ControlFlow;

use crate::language::LanguageKind;
use crate::syntax::walk::walk_preorder;
use crate::syntax::{NodeSpan, SyntaxNode, SyntaxTree};
use crate::types::DefinitionKind;

/// Maps a grammar node kind to a definition kind, `None` for non-definitions.
pub type DefinitionPredicate = fn(&str) -> Option<DefinitionKind>;

/// A definition node selected by the resolver, still in tree coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDefinition {
    pub kind: DefinitionKind,
    pub node_kind: String,
    pub span: NodeSpan,
}

/// Resolver parameterized by one language's definition predicate.
#[derive(Debug, Clone, Copy)]
pub struct ContextResolver {
    is_definition: DefinitionPredicate,
}

impl ContextResolver {
    pub fn new(is_definition: DefinitionPredicate) -> Self {
        Self { is_definition }
    }

    /// Resolver using the definition table of `language`.
    pub fn for_language(language: LanguageKind) -> Self {
        let predicate: DefinitionPredicate = match language {
            LanguageKind::Python => |k| LanguageKind::Python.definition_kind(k),
            LanguageKind::JavaScript => |k| LanguageKind::JavaScript.definition_kind(k),
            LanguageKind::TypeScript => |k| LanguageKind::TypeScript.definition_kind(k),
            LanguageKind::Tsx => |k| LanguageKind::Tsx.definition_kind(k),
            LanguageKind::Rust => |k| LanguageKind::Rust.definition_kind(k),
        };
        Self::new(predicate)
    }

    /// Resolve against a parsed tree.
    pub fn resolve(
        &self,
        tree: &SyntaxTree,
        first_row: usize,
        last_row: usize,
    ) -> Option<ResolvedDefinition> {
        self.resolve_node(tree.root(), first_row, last_row)
    }

    /// Resolve below any node implementing [`SyntaxNode`].
    pub fn resolve_node<N: SyntaxNode>(
        &self,
        root: N,
        first_row: usize,
        last_row: usize,
    ) -> Option<ResolvedDefinition> {
        largest_enclosing(root, first_row, last_row, self.is_definition)
    }
}

/// Largest definition node whose rows contain `[first_row, last_row]`.
///
/// `None` when nothing contains the interval, including inverted intervals.
pub fn largest_enclosing<N, P>(
    root: N,
    first_row: usize,
    last_row: usize,
    is_definition: P,
) -> Option<ResolvedDefinition>
where
    N: SyntaxNode,
    P: Fn(&str) -> Option<DefinitionKind>,
{
    if first_row > last_row {
        return None;
    }

    let mut best: Option<ResolvedDefinition> = None;
    walk_preorder::<N, (), _>(root, |node| {
        let Some(kind) = is_definition(node.node_kind()) else {
            return ControlFlow::Continue(());
        };
        let span = node.span();
        if span.contains_rows(first_row, last_row) {
            let larger = best
                .as_ref()
                .map_or(true, |b| span.row_extent() > b.span.row_extent());
            if larger {
                best = Some(ResolvedDefinition {
                    kind,
                    node_kind: node.node_kind().to_string(),
                    span,
                });
            }
        }
        ControlFlow::Continue(())
    });
    best
}
