//! Crate-wide error hierarchy for context-resolver.
//!
//! Malformed source code is never an error here: grammars are error-tolerant
//! and a broken file yields `valid: false` or `None` context. Only conditions
//! the caller cannot recover from by falling back (unknown language, a grammar
//! that failed to load or crashed) surface as [`ContextError`].

use thiserror::Error;

use crate::language::LanguageKind;

/// Convenient alias for crate-wide results.
pub type Result<T> = std::result::Result<T, ContextError>;

/// Root error type for the context-resolver crate.
#[derive(Debug, Error)]
pub enum ContextError {
    /// No provider is registered for the requested language tag or extension.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A grammar could not be loaded when building its provider.
    #[error("failed to load {language} grammar: {reason}")]
    Grammar {
        language: LanguageKind,
        reason: String,
    },

    /// Provider-level catastrophic failure (not malformed source).
    #[error("{language} parse failure: {reason}")]
    ParseFailure {
        language: LanguageKind,
        reason: String,
    },

    /// Unexpected failure while walking a parsed tree.
    #[error("{language} context resolution failure: {reason}")]
    ContextResolutionFailure {
        language: LanguageKind,
        reason: String,
    },

    /// Configuration problems (bad environment values).
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration errors raised while reading [`crate::config::ResolverConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value in {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

impl ContextError {
    /// `true` when the caller should fall back to "no context" behavior
    /// rather than treating the failure as a parse problem.
    pub fn is_unsupported_language(&self) -> bool {
        matches!(self, ContextError::UnsupportedLanguage(_))
    }
}
