use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use context_resolver::{
    ContextDescriptor, LanguageDispatcher, LanguageKind, ResolverConfig, changed_line_ranges,
    telemetry::{self, LogSettings},
};
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Resolve the enclosing definition of changed lines, for review prompts.
#[derive(Debug, Parser)]
#[command(name = "review-context", version)]
struct Cli {
    /// Log this tool's internals at DEBUG, with parse and resolve timings.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the enclosing context of a 1-based line range as JSON.
    Resolve {
        file: PathBuf,
        #[arg(long)]
        start: usize,
        #[arg(long)]
        end: usize,
        /// Language tag; detected from the extension when omitted.
        #[arg(long)]
        lang: Option<String>,
        /// Include the source lines of the context.
        #[arg(long)]
        snippet: bool,
    },
    /// Check that a file parses cleanly. Exits 1 when it does not.
    Check {
        file: PathBuf,
        #[arg(long)]
        lang: Option<String>,
    },
    /// Resolve the context of every hunk in a patch against the new file.
    Hunks {
        file: PathBuf,
        /// Unified diff of `file`.
        #[arg(long)]
        diff: PathBuf,
        #[arg(long)]
        lang: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    // A missing .env is fine; every setting has a default.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = ResolverConfig::from_env()?;
    init_tracing(LogSettings::new(cli.verbose, config.ast_dump));

    let dispatcher = LanguageDispatcher::with_config(config)?;

    match cli.command {
        Command::Resolve {
            file,
            start,
            end,
            lang,
            snippet,
        } => {
            let text = read_source(&file)?;
            let lang = pick_language(&dispatcher, &file, lang.as_deref())?;
            let ctx = dispatcher.resolve_for_language(lang, &text, start, end)?;
            let out = match ctx {
                Some(c) if snippet => serde_json::to_value(ContextDescriptor::new(c, &text))?,
                other => serde_json::to_value(other)?,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { file, lang } => {
            let text = read_source(&file)?;
            let lang = pick_language(&dispatcher, &file, lang.as_deref())?;
            let res = dispatcher.check_for_language(lang, &text);
            println!("{}", serde_json::to_string_pretty(&res)?);
            Ok(if res.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Hunks { file, diff, lang } => {
            let text = read_source(&file)?;
            let patch = read_source(&diff)?;
            let lang = pick_language(&dispatcher, &file, lang.as_deref())?;
            let hunks = changed_line_ranges(&patch);
            for h in hunks {
                let range = h.added.unwrap_or(h.lines);
                let ctx = dispatcher.resolve_for_language(lang, &text, range.start, range.end)?;
                let row = json!({ "hunk": h, "context": ctx });
                println!("{}", serde_json::to_string(&row)?);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(settings: LogSettings) {
    let _ = tracing_subscriber::registry()
        .with(telemetry::layer(settings))
        .try_init();
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn pick_language(
    dispatcher: &LanguageDispatcher,
    file: &Path,
    tag: Option<&str>,
) -> Result<LanguageKind> {
    let lang = match tag {
        Some(t) => dispatcher.language_for_tag(t)?,
        None => dispatcher.language_for_path(file)?,
    };
    Ok(lang)
}
