//! Syntax tree layer: the node abstraction, the shared traversal, and the
//! per-language tree-sitter provider.

pub mod node;
pub mod provider;
pub mod walk;

#[cfg(test)]
pub(crate) mod testing;

pub use node::{NodeSpan, Position, SyntaxNode};
pub use provider::{SyntaxTree, SyntaxTreeProvider};
