// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `modgen`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "modgen",
    version,
    about = "Generate CommonJS, UMD, AMD and SystemJS variants of ES modules, and keep them up to date.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Relative patterns in the config are resolved against the directory
    /// containing this file.
    #[arg(long, value_name = "PATH", default_value = "Modgen.toml")]
    pub config: String,

    /// Run the initial build only, no watching.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MODGEN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, list the files that would be generated, but don't
    /// write anything.
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
