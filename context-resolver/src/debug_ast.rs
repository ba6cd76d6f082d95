//! AST dump helpers for troubleshooting grammars.
//!
//! Dumps go to the `DEBUG` log and never fail the calling operation.
//! - `Full`  dumps every parsed tree;
//! - `Error` dumps only trees the validity check rejected.

use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;
use crate::syntax::SyntaxTree;

/// Controls when AST dumps are logged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AstDumpMode {
    /// Do not dump.
    #[default]
    None,
    /// Dump every successfully parsed tree.
    Full,
    /// Dump only trees that contain error markers.
    Error,
}

impl FromStr for AstDumpMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "" => Ok(Self::None),
            "full" => Ok(Self::Full),
            "error" => Ok(Self::Error),
            other => Err(ConfigError::InvalidValue {
                var: "CONTEXT_AST_DUMP",
                reason: format!("expected `none`, `full` or `error`, got `{other}`"),
            }),
        }
    }
}

/// Maximum number of characters of node source per dump line.
pub const AST_DUMP_MAX_TEXT: usize = 160;

/// Dump right after a parse when mode is `Full`.
pub fn maybe_dump_on_full(mode: AstDumpMode, tree: &SyntaxTree, code: &str) {
    if matches!(mode, AstDumpMode::Full) {
        debug!(
            "AST dump (full) language={}\n{}",
            tree.language(),
            dump_ast_full(tree, code)
        );
    }
}

/// Dump a tree the validity check rejected when mode is `Error`.
pub fn maybe_dump_on_invalid(mode: AstDumpMode, tree: &SyntaxTree, code: &str, diagnostic: &str) {
    if matches!(mode, AstDumpMode::Error) {
        debug!(
            "AST dump (invalid) language={} diagnostic={diagnostic}\n{}",
            tree.language(),
            dump_ast_full(tree, code)
        );
    }
}

/// Full (named + unnamed) dump, one node per line, indented by depth.
pub fn dump_ast_full(tree: &SyntaxTree, code: &str) -> String {
    let mut out = String::new();

    let mut stack = vec![(tree.root(), 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let s = node.start_byte().min(code.len());
        let e = node.end_byte().min(code.len()).max(s);
        let text: String = code
            .get(s..e)
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(AST_DUMP_MAX_TEXT)
            .collect();
        let p = node.start_position();
        let marker = if node.is_missing() {
            " MISSING"
        } else if node.is_error() {
            " ERROR"
        } else {
            ""
        };

        let _ = writeln!(
            &mut out,
            "{indent}{kind} [{row}:{col}]{marker} text={text}",
            indent = " ".repeat(depth * 2),
            kind = node.kind(),
            row = p.row,
            col = p.column,
        );

        let mut w = node.walk();
        let children: Vec<_> = node.children(&mut w).collect();
        for ch in children.into_iter().rev() {
            stack.push((ch, depth + 1));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageKind;
    use crate::syntax::SyntaxTreeProvider;

    #[test]
    fn dump_lists_nodes_with_indentation() {
        let p = SyntaxTreeProvider::new(LanguageKind::Python).unwrap();
        let code = "def f():\n    return 1\n";
        let tree = p.parse(code).unwrap();
        let dump = dump_ast_full(&tree, code);
        assert!(dump.starts_with("module [0:0]"));
        assert!(dump.contains("\n  function_definition [0:0] text=def f():"));
    }

    #[test]
    fn mode_parses_from_env_value() {
        assert_eq!("Full".parse::<AstDumpMode>().unwrap(), AstDumpMode::Full);
        assert_eq!("".parse::<AstDumpMode>().unwrap(), AstDumpMode::None);
        assert!("verbose".parse::<AstDumpMode>().is_err());
    }
}
