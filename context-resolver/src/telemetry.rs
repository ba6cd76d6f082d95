//! Log output for binaries embedding the resolver.
//!
//! The resolver only emits `tracing` events; this module decides which of
//! them a front end shows. AST dumps are `DEBUG` events, so enabling a dump
//! mode raises this crate's level to `DEBUG` even without `--verbose`.
//! Span timings (one line per closed `parse`/`resolve_for_language` span) are
//! reserved for verbose runs.

use std::io::{self, IsTerminal};

use chrono::{SecondsFormat, Utc};
use tracing::Level;
use tracing_subscriber::fmt::format::{FmtSpan, Writer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::debug_ast::AstDumpMode;

/// Target of every event this crate emits.
pub const TARGET: &str = "context_resolver";

/// What the front end asked to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub level: Level,
    pub span_timings: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self::new(false, AstDumpMode::None)
    }
}

impl LogSettings {
    pub fn new(verbose: bool, ast_dump: AstDumpMode) -> Self {
        let wants_debug = verbose || ast_dump != AstDumpMode::None;
        Self {
            level: if wants_debug { Level::DEBUG } else { Level::INFO },
            span_timings: verbose,
        }
    }

    /// Filter directive for this crate, e.g. `context_resolver=debug`.
    pub fn directive(&self) -> String {
        format!("{TARGET}={}", self.level.as_str().to_ascii_lowercase())
    }

    /// `RUST_LOG` when set, otherwise `warn` globally plus [`Self::directive`].
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{}", self.directive())))
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_timings {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// `2025-09-12T10:20:30.123Z`; millis make parse timings readable.
fn utc_millis(w: &mut Writer<'_>) -> std::fmt::Result {
    w.write_str(&Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Stderr layer configured by `settings`; stdout stays free for command output.
pub fn layer<S>(settings: LogSettings) -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let timer: fn(&mut Writer<'_>) -> std::fmt::Result = utc_millis;
    fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(timer)
        .with_target(settings.level == Level::DEBUG)
        .with_span_events(settings.span_events())
        .compact()
        .with_filter(settings.env_filter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_by_default() {
        let s = LogSettings::default();
        assert_eq!(s.level, Level::INFO);
        assert!(!s.span_timings);
        assert_eq!(s.directive(), "context_resolver=info");
    }

    #[test]
    fn ast_dump_implies_debug_without_timings() {
        let s = LogSettings::new(false, AstDumpMode::Error);
        assert_eq!(s.level, Level::DEBUG);
        assert!(!s.span_timings);
        assert_eq!(s.directive(), "context_resolver=debug");
    }

    #[test]
    fn verbose_adds_span_timings() {
        let s = LogSettings::new(true, AstDumpMode::None);
        assert_eq!(s.level, Level::DEBUG);
        assert_eq!(s.span_events(), FmtSpan::CLOSE);
    }
}
