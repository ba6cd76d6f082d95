//! Hand-built trees for exercising the traversal without a grammar.

use super::node::{NodeSpan, Position, SyntaxNode};

#[derive(Debug, Clone)]
pub(crate) struct OwnedNode {
    pub kind: String,
    pub span: NodeSpan,
    pub error: bool,
    pub children: Vec<OwnedNode>,
}

impl OwnedNode {
    pub fn new(kind: &str, start_row: usize, end_row: usize) -> Self {
        Self {
            kind: kind.to_string(),
            span: NodeSpan::new(Position::new(start_row, 0), Position::new(end_row, 0)),
            error: false,
            children: Vec::new(),
        }
    }

    pub fn error(start_row: usize, end_row: usize) -> Self {
        Self {
            error: true,
            ..Self::new("ERROR", start_row, end_row)
        }
    }

    pub fn with_children(mut self, children: Vec<OwnedNode>) -> Self {
        self.children = children;
        self
    }
}

impl SyntaxNode for OwnedNode {
    fn node_kind(&self) -> &str {
        &self.kind
    }

    fn span(&self) -> NodeSpan {
        self.span
    }

    fn is_error_marker(&self) -> bool {
        self.error
    }

    fn child_nodes(&self) -> Vec<Self> {
        self.children.clone()
    }
}
