//! Generic node abstraction the traversal runs on.
//!
//! Rows and columns here are 0-based, exactly as the grammar reports them.
//! Conversion to caller line numbers happens once, in the dispatcher.

use tree_sitter::{Node, Point};

/// 0-based row/column inside a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Self {
            row: p.row,
            column: p.column,
        }
    }
}

/// Inclusive start/end position a node covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeSpan {
    pub start: Position,
    pub end: Position,
}

impl NodeSpan {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Size in rows (`end.row - start.row`); single-line nodes are 0.
    pub fn row_extent(&self) -> usize {
        self.end.row.saturating_sub(self.start.row)
    }

    /// Row-wise containment of `[first_row, last_row]`.
    ///
    /// An inverted interval is never contained.
    pub fn contains_rows(&self, first_row: usize, last_row: usize) -> bool {
        first_row <= last_row && self.start.row <= first_row && last_row <= self.end.row
    }
}

/// Read-only view of a concrete syntax tree node.
///
/// Implemented for `tree_sitter::Node`; anything with a kind tag, a span and
/// ordered children can be walked by [`super::walk`].
pub trait SyntaxNode: Sized {
    /// Grammar production tag.
    fn node_kind(&self) -> &str;

    /// Position range covered by this node.
    fn span(&self) -> NodeSpan;

    /// `true` for the grammar's designated error markers.
    fn is_error_marker(&self) -> bool;

    /// Children in source order.
    fn child_nodes(&self) -> Vec<Self>;
}

impl<'tree> SyntaxNode for Node<'tree> {
    fn node_kind(&self) -> &str {
        self.kind()
    }

    fn span(&self) -> NodeSpan {
        NodeSpan {
            start: self.start_position().into(),
            end: self.end_position().into(),
        }
    }

    /// Tree-sitter reports malformed input two ways: `ERROR` nodes wrapping
    /// unparseable tokens, and zero-width `MISSING` nodes it inserted to
    /// recover (e.g. an unclosed `}`). Both count.
    fn is_error_marker(&self) -> bool {
        self.is_error() || self.is_missing()
    }

    fn child_nodes(&self) -> Vec<Self> {
        let mut cursor = self.walk();
        self.children(&mut cursor).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(a: usize, b: usize) -> NodeSpan {
        NodeSpan::new(Position::new(a, 0), Position::new(b, 1))
    }

    #[test]
    fn containment_is_row_wise_and_inclusive() {
        let s = span(2, 6);
        assert!(s.contains_rows(2, 6));
        assert!(s.contains_rows(3, 3));
        assert!(!s.contains_rows(1, 3));
        assert!(!s.contains_rows(5, 7));
    }

    #[test]
    fn inverted_interval_is_never_contained() {
        assert!(!span(0, 100).contains_rows(5, 4));
    }

    #[test]
    fn row_extent() {
        assert_eq!(span(4, 4).row_extent(), 0);
        assert_eq!(span(4, 9).row_extent(), 5);
    }
}
