// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::ReuseMode;

/// Command-line arguments for `passplan`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "passplan",
    version,
    about = "Plan execution order, concurrent batches and pooled instances for a pass graph.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the graph description (TOML).
    ///
    /// Default: `Passplan.toml` in the current working directory.
    #[arg(long, value_name = "PATH")]
    pub graph: Option<PathBuf>,

    /// Override `[planner].reuse` (in-place or after-pass).
    #[arg(long, value_name = "MODE")]
    pub reuse: Option<ReuseMode>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PASSPLAN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate and print the graph, but don't plan it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
