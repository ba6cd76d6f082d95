//! Enclosing-context resolution for code review.
//!
//! Given a file's text and a changed line range (typically from a diff
//! hunk), find the function/class/method definition that contains it, so the
//! reviewer can show the hunk with its full surrounding definition. A
//! companion check reports whether the file parses cleanly.
//!
//! Layers, leaves first:
//! - [`syntax`]: tree-sitter provider per language and the one generic
//!   traversal every query uses;
//! - [`resolver`]: largest containing definition for a row interval;
//! - [`validity`]: error-marker search over the whole tree;
//! - [`dispatcher`]: language selection and the 1-based public boundary.
//!
//! # Example
//! ```no_run
//! use context_resolver::LanguageDispatcher;
//!
//! fn main() -> context_resolver::Result<()> {
//!     let dispatcher = LanguageDispatcher::new()?;
//!     let text = "class A:\n    def m(self):\n        return 1\n";
//!     if let Some(ctx) = dispatcher.resolve_enclosing_context("python", text, 3, 3)? {
//!         println!("{:?} lines {}..={}", ctx.kind, ctx.span.start.line, ctx.span.end.line);
//!     }
//!     let check = dispatcher.check_validity("python", text)?;
//!     assert!(check.valid);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod debug_ast;
pub mod dispatcher;
pub mod errors;
pub mod hunks;
pub mod language;
pub mod resolver;
pub mod snippet;
pub mod syntax;
pub mod telemetry;
pub mod types;
pub mod validity;

pub use config::ResolverConfig;
pub use dispatcher::LanguageDispatcher;
pub use errors::{ConfigError, ContextError, Result};
pub use hunks::{HunkRange, LineRange, changed_line_ranges};
pub use language::LanguageKind;
pub use snippet::{ContextDescriptor, context_snippet};
pub use types::{DefinitionKind, EnclosingContext, LineColumn, LineColumnRange, ValidityResult};
pub use validity::ValidityPolicy;
