//! The one traversal every query uses.
//!
//! Depth-first, pre-order, explicit stack (no recursion, so deeply nested
//! bodies cannot blow the call stack). Each call owns its stack; nothing is
//! shared between concurrent walks.

use std::ops::ControlFlow;

use super::node::SyntaxNode;

/// Visit every node under `root` (inclusive) in document order.
///
/// Returning `ControlFlow::Break(b)` from `visit` stops the walk and yields
/// `Some(b)`; a walk that visits everything yields `None`.
pub fn walk_preorder<N, B, F>(root: N, mut visit: F) -> Option<B>
where
    N: SyntaxNode,
    F: FnMut(&N) -> ControlFlow<B>,
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let ControlFlow::Break(b) = visit(&node) {
            return Some(b);
        }
        // Reverse so the leftmost child is popped first.
        stack.extend(node.child_nodes().into_iter().rev());
    }
    None
}

/// Collect every node matching `pred`, in document order.
pub fn collect_matching<N, F>(root: N, mut pred: F) -> Vec<N>
where
    N: SyntaxNode + Clone,
    F: FnMut(&N) -> bool,
{
    let mut out = Vec::new();
    walk_preorder::<N, (), _>(root, |n| {
        if pred(n) {
            out.push(n.clone());
        }
        ControlFlow::Continue(())
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::testing::OwnedNode;

    fn sample() -> OwnedNode {
        OwnedNode::new("module", 0, 9).with_children(vec![
            OwnedNode::new("a", 0, 3).with_children(vec![OwnedNode::new("a1", 1, 2)]),
            OwnedNode::new("b", 4, 9).with_children(vec![
                OwnedNode::new("b1", 5, 6),
                OwnedNode::new("b2", 7, 9).with_children(vec![OwnedNode::new("b2x", 8, 8)]),
            ]),
        ])
    }

    #[test]
    fn visits_every_node_in_document_order() {
        let mut seen = Vec::new();
        let out = walk_preorder::<_, (), _>(sample(), |n| {
            seen.push(n.kind.clone());
            ControlFlow::Continue(())
        });
        assert!(out.is_none());
        assert_eq!(seen, vec!["module", "a", "a1", "b", "b1", "b2", "b2x"]);
    }

    #[test]
    fn break_stops_early() {
        let mut count = 0;
        let hit = walk_preorder(sample(), |n| {
            count += 1;
            if n.kind == "b1" {
                ControlFlow::Break(n.span.start.row)
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(hit, Some(5));
        assert_eq!(count, 5);
    }

    #[test]
    fn collect_reaches_deepest_level() {
        let found = collect_matching(sample(), |n| n.kind.ends_with('x'));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, "b2x");
    }
}
