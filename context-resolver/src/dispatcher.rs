//! LanguageDispatcher selects the provider/resolver pair for a language and
//! owns the public coordinate convention.
//!
//! Public lines are 1-based inclusive (unified diff numbering); tree rows are
//! 0-based. The conversion happens here and nowhere else.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use tracing::{debug, error, warn};

use crate::config::ResolverConfig;
use crate::debug_ast::{maybe_dump_on_full, maybe_dump_on_invalid};
use crate::errors::{ContextError, Result};
use crate::language::LanguageKind;
use crate::resolver::{ContextResolver, ResolvedDefinition};
use crate::syntax::SyntaxTreeProvider;
use crate::types::{EnclosingContext, LineColumn, LineColumnRange, ValidityResult};
use crate::validity::check_node;

/// Provider + resolver registered for one language.
#[derive(Debug, Clone)]
pub struct LanguageBackend {
    pub provider: SyntaxTreeProvider,
    pub resolver: ContextResolver,
}

impl LanguageBackend {
    pub fn new(language: LanguageKind) -> Result<Self> {
        Ok(Self {
            provider: SyntaxTreeProvider::new(language)?,
            resolver: ContextResolver::for_language(language),
        })
    }
}

/// Uniform entry point for callers (prompt builders, CLI).
///
/// Immutable after construction, so one instance can serve concurrent calls.
#[derive(Debug)]
pub struct LanguageDispatcher {
    backends: BTreeMap<LanguageKind, LanguageBackend>,
    config: ResolverConfig,
}

impl LanguageDispatcher {
    /// Dispatcher with every supported language enabled.
    pub fn new() -> Result<Self> {
        Self::with_config(ResolverConfig::default())
    }

    /// Build providers for every language in `config`.
    ///
    /// A grammar that fails to load fails construction.
    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        let mut backends = BTreeMap::new();
        for &lang in &config.languages {
            backends.insert(lang, LanguageBackend::new(lang)?);
        }
        debug!(
            "dispatcher ready: languages={:?} policy={:?}",
            backends.keys().collect::<Vec<_>>(),
            config.validity_policy
        );
        Ok(Self { backends, config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Languages with a registered backend.
    pub fn supported_languages(&self) -> Vec<LanguageKind> {
        self.backends.keys().copied().collect()
    }

    /// Map a language tag to an enabled language.
    pub fn language_for_tag(&self, tag: &str) -> Result<LanguageKind> {
        let lang = tag.parse::<LanguageKind>()?;
        self.enabled(lang, tag)
    }

    /// Map a file path (by extension) to an enabled language.
    pub fn language_for_path(&self, path: &Path) -> Result<LanguageKind> {
        let shown = path.display().to_string();
        let lang = LanguageKind::from_path(path)
            .ok_or_else(|| ContextError::UnsupportedLanguage(shown.clone()))?;
        self.enabled(lang, &shown)
    }

    fn enabled(&self, lang: LanguageKind, requested: &str) -> Result<LanguageKind> {
        if self.backends.contains_key(&lang) {
            Ok(lang)
        } else {
            Err(ContextError::UnsupportedLanguage(requested.to_string()))
        }
    }

    fn backend(&self, lang: LanguageKind) -> Result<&LanguageBackend> {
        self.backends
            .get(&lang)
            .ok_or_else(|| ContextError::UnsupportedLanguage(lang.to_string()))
    }

    /// Find the definition enclosing `[line_start, line_end]` (1-based,
    /// inclusive) in `text`.
    ///
    /// `Ok(None)` means "no enclosing context": top-level code, a range
    /// outside the file, `line_start == 0` or `line_start > line_end`.
    ///
    /// # Errors
    /// - `UnsupportedLanguage` for unknown or disabled tags;
    /// - `ParseFailure` if the provider cannot produce a tree;
    /// - `ContextResolutionFailure` if parsing or the traversal crashes.
    pub fn resolve_enclosing_context(
        &self,
        language_tag: &str,
        text: &str,
        line_start: usize,
        line_end: usize,
    ) -> Result<Option<EnclosingContext>> {
        let lang = self.language_for_tag(language_tag)?;
        self.resolve_for_language(lang, text, line_start, line_end)
    }

    /// Same as [`Self::resolve_enclosing_context`], language detected from `path`.
    pub fn resolve_for_path(
        &self,
        path: &Path,
        text: &str,
        line_start: usize,
        line_end: usize,
    ) -> Result<Option<EnclosingContext>> {
        let lang = self.language_for_path(path)?;
        self.resolve_for_language(lang, text, line_start, line_end)
    }

    #[tracing::instrument(level = "debug", skip(self, text), fields(bytes = text.len()))]
    pub fn resolve_for_language(
        &self,
        lang: LanguageKind,
        text: &str,
        line_start: usize,
        line_end: usize,
    ) -> Result<Option<EnclosingContext>> {
        let backend = self.backend(lang)?;

        let (Some(first_row), Some(last_row)) = (line_start.checked_sub(1), line_end.checked_sub(1))
        else {
            debug!("line 0 is not a valid 1-based line; no context");
            return Ok(None);
        };
        if first_row > last_row {
            debug!("inverted range {line_start}..{line_end}; no context");
            return Ok(None);
        }

        // Parse and walk share one guard: a crash in either is a resolution
        // failure, while a parser that returns no tree stays `ParseFailure`.
        let found = catch_unwind(AssertUnwindSafe(|| -> Result<Option<ResolvedDefinition>> {
            let tree = backend.provider.parse(text)?;
            maybe_dump_on_full(self.config.ast_dump, &tree, text);
            Ok(backend.resolver.resolve(&tree, first_row, last_row))
        }))
        .map_err(|payload| {
            let reason = panic_message(payload.as_ref());
            error!("context resolution crashed: language={lang} reason={reason}");
            ContextError::ContextResolutionFailure {
                language: lang,
                reason,
            }
        })??;

        let ctx = found.map(to_enclosing_context);
        match &ctx {
            Some(c) => debug!(
                "context: {} lines {}..={}",
                c.node_kind, c.span.start.line, c.span.end.line
            ),
            None => debug!("no enclosing definition for {line_start}..={line_end}"),
        }
        Ok(ctx)
    }

    /// Classify whether `text` parses cleanly.
    ///
    /// Parse failures become `valid: false` with the failure as diagnostic;
    /// only an unknown or disabled language is an error.
    pub fn check_validity(&self, language_tag: &str, text: &str) -> Result<ValidityResult> {
        let lang = self.language_for_tag(language_tag)?;
        Ok(self.check_for_language(lang, text))
    }

    /// Same as [`Self::check_validity`], language detected from `path`.
    pub fn check_validity_for_path(&self, path: &Path, text: &str) -> Result<ValidityResult> {
        let lang = self.language_for_path(path)?;
        Ok(self.check_for_language(lang, text))
    }

    #[tracing::instrument(level = "debug", skip(self, text), fields(bytes = text.len()))]
    pub fn check_for_language(&self, lang: LanguageKind, text: &str) -> ValidityResult {
        let backend = match self.backend(lang) {
            Ok(b) => b,
            Err(e) => return ValidityResult::invalid(e.to_string()),
        };
        let tree = match backend.provider.parse(text) {
            Ok(t) => t,
            Err(e) => {
                warn!("validity: parse failed: {e}");
                return ValidityResult::invalid(e.to_string());
            }
        };
        maybe_dump_on_full(self.config.ast_dump, &tree, text);

        let policy = self.config.validity_policy;
        let result = catch_unwind(AssertUnwindSafe(|| check_node(tree.root(), lang, policy)))
            .unwrap_or_else(|payload| {
                let reason = panic_message(payload.as_ref());
                error!("validity check crashed: language={lang} reason={reason}");
                ValidityResult::invalid(format!("{lang} validity check failed: {reason}"))
            });

        if !result.valid {
            debug!("validity: {}", result.diagnostic);
            maybe_dump_on_invalid(self.config.ast_dump, &tree, text, &result.diagnostic);
        }
        result
    }
}

/// Tree rows (0-based) → caller lines (1-based). Columns are kept.
fn to_enclosing_context(def: ResolvedDefinition) -> EnclosingContext {
    EnclosingContext {
        kind: def.kind,
        node_kind: def.node_kind,
        span: LineColumnRange {
            start: LineColumn {
                line: def.span.start.row + 1,
                column: def.span.start.column,
            },
            end: LineColumn {
                line: def.span.end.row + 1,
                column: def.span.end.column,
            },
        },
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DefinitionKind;

    const TWO_FUNCS: &str = "\
def a():
    x = 1
    y = 2
    z = x + y
    return z

def b(items):
    total = 0
    for i in items:
        total += i
    print(total)
    return total
";

    fn dispatcher() -> LanguageDispatcher {
        LanguageDispatcher::new().expect("all grammars load")
    }

    #[test]
    fn public_lines_are_one_based() {
        let d = dispatcher();
        let ctx = d
            .resolve_enclosing_context("python", TWO_FUNCS, 1, 1)
            .unwrap()
            .unwrap();
        assert_eq!(ctx.kind, DefinitionKind::FunctionDefinition);
        assert_eq!(ctx.span.start, LineColumn { line: 1, column: 0 });
        assert_eq!(ctx.span.end.line, 5);
    }

    #[test]
    fn line_zero_and_inverted_ranges_are_none() {
        let d = dispatcher();
        assert_eq!(d.resolve_enclosing_context("py", TWO_FUNCS, 0, 3).unwrap(), None);
        assert_eq!(d.resolve_enclosing_context("py", TWO_FUNCS, 9, 8).unwrap(), None);
    }

    #[test]
    fn unsupported_language_is_distinct_from_parse_failure() {
        let d = dispatcher();
        let err = d
            .resolve_enclosing_context("haskell", "main = pure ()", 1, 1)
            .unwrap_err();
        assert!(err.is_unsupported_language());
        let err = d.check_validity("haskell", "main = pure ()").unwrap_err();
        assert!(err.is_unsupported_language());
    }

    #[test]
    fn disabled_language_is_unsupported() {
        let d = LanguageDispatcher::with_config(ResolverConfig {
            languages: vec![LanguageKind::Rust],
            ..ResolverConfig::default()
        })
        .unwrap();
        assert_eq!(d.supported_languages(), vec![LanguageKind::Rust]);
        let err = d.check_validity("python", "x = 1\n").unwrap_err();
        assert!(err.is_unsupported_language());
    }

    #[test]
    fn language_from_path() {
        let d = dispatcher();
        let ctx = d
            .resolve_for_path(Path::new("pkg/mod.py"), TWO_FUNCS, 8, 10)
            .unwrap()
            .unwrap();
        assert_eq!(ctx.span.start.line, 7);
        assert!(d.language_for_path(Path::new("README.md")).is_err());
    }

    #[test]
    fn repeated_queries_are_identical() {
        let d = dispatcher();
        let a = d.resolve_enclosing_context("python", TWO_FUNCS, 3, 4).unwrap();
        let b = d.resolve_enclosing_context("python", TWO_FUNCS, 3, 4).unwrap();
        assert_eq!(a, b);
    }

    fn exploding_predicate(_kind: &str) -> Option<DefinitionKind> {
        panic!("definition table exploded")
    }

    #[test]
    fn crashing_resolution_is_an_error_not_none() {
        let mut d = dispatcher();
        d.backends.insert(
            LanguageKind::Python,
            LanguageBackend {
                provider: SyntaxTreeProvider::new(LanguageKind::Python).unwrap(),
                resolver: ContextResolver::new(exploding_predicate),
            },
        );

        let err = d
            .resolve_enclosing_context("python", TWO_FUNCS, 3, 3)
            .unwrap_err();
        match err {
            ContextError::ContextResolutionFailure { language, reason } => {
                assert_eq!(language, LanguageKind::Python);
                assert!(reason.contains("definition table exploded"), "{reason}");
            }
            other => panic!("expected ContextResolutionFailure, got {other:?}"),
        }

        // Other languages keep working after the crash.
        let ok = d.resolve_enclosing_context("rust", "fn f() {\n    1;\n}\n", 2, 2);
        assert!(ok.unwrap().is_some());
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }
}
