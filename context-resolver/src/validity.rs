//! Syntax validity check.
//!
//! A file is valid when its tree contains no error markers anywhere. The
//! walk covers the whole tree; errors nested deep inside a function body
//! count the same as top-level ones.

use std::fmt::Write as _;
use std::ops::ControlFlow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::language::LanguageKind;
use crate::syntax::walk::walk_preorder;
use crate::syntax::{Position, SyntaxNode};
use crate::types::ValidityResult;

/// How far the checker searches once it has found an error.
///
/// Only the diagnostic differs; the `valid` flag is the same under both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityPolicy {
    /// Report the first error marker in document order.
    #[default]
    StopAtFirst,
    /// Report every error marker.
    CollectAll,
}

impl FromStr for ValidityPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "stop_at_first" => Ok(Self::StopAtFirst),
            "all" | "collect_all" => Ok(Self::CollectAll),
            other => Err(ConfigError::InvalidValue {
                var: "CONTEXT_VALIDITY_POLICY",
                reason: format!("expected `first` or `all`, got `{other}`"),
            }),
        }
    }
}

/// One error marker found in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMarker {
    /// Grammar kind of the marker (`ERROR`, or the missing token's kind).
    pub node_kind: String,
    /// `true` when the grammar inserted a missing token.
    pub missing: bool,
    pub position: Position,
}

impl ErrorMarker {
    fn describe(&self) -> String {
        let what = if self.missing {
            format!("missing `{}`", self.node_kind)
        } else {
            "unexpected input".to_string()
        };
        // 1-based line for humans; column stays 0-based like the grammar.
        format!(
            "line {}, column {} ({what})",
            self.position.row + 1,
            self.position.column
        )
    }
}

/// Find error markers under `root` according to `policy`.
pub fn find_error_markers<N: SyntaxNode>(root: N, policy: ValidityPolicy) -> Vec<ErrorMarker> {
    let mut out = Vec::new();
    walk_preorder::<N, (), _>(root, |node| {
        if !node.is_error_marker() {
            return ControlFlow::Continue(());
        }
        out.push(ErrorMarker {
            node_kind: node.node_kind().to_string(),
            // Missing nodes are zero-width placeholders with a real token kind.
            missing: node.node_kind() != "ERROR",
            position: node.span().start,
        });
        match policy {
            ValidityPolicy::StopAtFirst => ControlFlow::Break(()),
            ValidityPolicy::CollectAll => ControlFlow::Continue(()),
        }
    });
    out
}

/// Check a tree rooted at `root` and build the caller-facing result.
pub fn check_node<N: SyntaxNode>(
    root: N,
    language: LanguageKind,
    policy: ValidityPolicy,
) -> ValidityResult {
    let markers = find_error_markers(root, policy);
    if markers.is_empty() {
        return ValidityResult::valid();
    }
    ValidityResult::invalid(render_diagnostic(language, &markers, policy))
}

fn render_diagnostic(
    language: LanguageKind,
    markers: &[ErrorMarker],
    policy: ValidityPolicy,
) -> String {
    let mut s = String::new();
    match policy {
        ValidityPolicy::StopAtFirst => {
            let _ = write!(
                s,
                "syntax error in {language} code at {}",
                markers[0].describe()
            );
        }
        ValidityPolicy::CollectAll => {
            let _ = write!(s, "{} syntax error(s) in {language} code:", markers.len());
            for m in markers {
                let _ = write!(s, "\n  - {}", m.describe());
            }
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::testing::OwnedNode;

    fn nested_error_tree() -> OwnedNode {
        OwnedNode::new("module", 0, 12).with_children(vec![
            OwnedNode::new("function_definition", 0, 6).with_children(vec![
                OwnedNode::new("block", 1, 6).with_children(vec![
                    OwnedNode::new("if_statement", 2, 5).with_children(vec![
                        OwnedNode::new("block", 3, 5).with_children(vec![OwnedNode::error(4, 4)]),
                    ]),
                ]),
            ]),
            OwnedNode::new("function_definition", 8, 12)
                .with_children(vec![OwnedNode::error(10, 10)]),
        ])
    }

    #[test]
    fn deeply_nested_error_is_found() {
        let markers = find_error_markers(nested_error_tree(), ValidityPolicy::StopAtFirst);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].position.row, 4);
        assert!(!markers[0].missing);
    }

    #[test]
    fn collect_all_reports_every_marker() {
        let markers = find_error_markers(nested_error_tree(), ValidityPolicy::CollectAll);
        let rows: Vec<usize> = markers.iter().map(|m| m.position.row).collect();
        assert_eq!(rows, vec![4, 10]);
    }

    #[test]
    fn policy_changes_only_the_diagnostic() {
        let first = check_node(
            nested_error_tree(),
            LanguageKind::Python,
            ValidityPolicy::StopAtFirst,
        );
        let all = check_node(
            nested_error_tree(),
            LanguageKind::Python,
            ValidityPolicy::CollectAll,
        );
        assert!(!first.valid);
        assert!(!all.valid);
        assert_eq!(
            first.diagnostic,
            "syntax error in python code at line 5, column 0 (unexpected input)"
        );
        assert!(all.diagnostic.starts_with("2 syntax error(s) in python code:"));
    }

    #[test]
    fn clean_tree_is_valid_with_empty_diagnostic() {
        let root = OwnedNode::new("module", 0, 3)
            .with_children(vec![OwnedNode::new("function_definition", 0, 3)]);
        let res = check_node(root, LanguageKind::Python, ValidityPolicy::CollectAll);
        assert_eq!(res, ValidityResult::valid());
    }

    #[test]
    fn policy_from_env_value() {
        assert_eq!("ALL".parse::<ValidityPolicy>().unwrap(), ValidityPolicy::CollectAll);
        assert_eq!("first".parse::<ValidityPolicy>().unwrap(), ValidityPolicy::StopAtFirst);
        assert!("sometimes".parse::<ValidityPolicy>().is_err());
    }
}
