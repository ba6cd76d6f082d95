//! Resolver configuration, loaded from environment variables.
//!
//! # Environment variables
//! - `CONTEXT_LANGUAGES`       = comma-separated language tags to enable (default: all)
//! - `CONTEXT_VALIDITY_POLICY` = `first` | `all` (default: `first`)
//! - `CONTEXT_AST_DUMP`        = `none` | `full` | `error` (default: `none`)

use serde::{Deserialize, Serialize};

use crate::debug_ast::AstDumpMode;
use crate::errors::{ConfigError, Result};
use crate::language::LanguageKind;
use crate::validity::ValidityPolicy;

/// Configuration for a [`crate::LanguageDispatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Languages to build providers for.
    pub languages: Vec<LanguageKind>,
    /// Search policy of the validity check.
    pub validity_policy: ValidityPolicy,
    /// When to log AST dumps.
    pub ast_dump: AstDumpMode,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            languages: LanguageKind::ALL.to_vec(),
            validity_policy: ValidityPolicy::default(),
            ast_dump: AstDumpMode::default(),
        }
    }
}

impl ResolverConfig {
    /// Read the configuration from the process environment.
    ///
    /// Unset or blank variables keep their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for unknown tags or values.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = non_blank(lookup("CONTEXT_LANGUAGES")) {
            cfg.languages = parse_languages(&v)?;
        }
        if let Some(v) = non_blank(lookup("CONTEXT_VALIDITY_POLICY")) {
            cfg.validity_policy = v.parse()?;
        }
        if let Some(v) = non_blank(lookup("CONTEXT_AST_DUMP")) {
            cfg.ast_dump = v.parse()?;
        }
        Ok(cfg)
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn parse_languages(raw: &str) -> std::result::Result<Vec<LanguageKind>, ConfigError> {
    let mut out = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let lang = LanguageKind::from_tag(tag).ok_or_else(|| ConfigError::InvalidValue {
            var: "CONTEXT_LANGUAGES",
            reason: format!("unknown language tag `{tag}`"),
        })?;
        if !out.contains(&lang) {
            out.push(lang);
        }
    }
    Ok(out)
}
