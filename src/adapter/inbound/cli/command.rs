//! Command-line interface definitions.
//!
//! The `run` subcommand starts the market maker. `scan` and `check` are
//! read-only helpers for choosing a market and validating setup. `smoke`
//! places and cancels real one-contract orders to prove the order path.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Automated market maker for Kalshi binary markets
#[derive(Parser, Debug)]
#[command(name = "fairquote")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Quote a market until interrupted
    Run(RunArgs),

    /// List markets that pass the discovery screen
    Scan(ScanArgs),

    /// Validate configuration and authenticate against the API
    Check(CheckArgs),

    /// Quote one contract per side until both rest, then cancel both
    Smoke(SmokeArgs),
}

/// Arguments for `fairquote run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Market to quote (skips discovery)
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Never replace the configured market with a discovered one
    #[arg(long)]
    pub no_discover: bool,

    /// Override log level
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for `fairquote scan`.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Maximum candidates to print
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}

/// Arguments for `fairquote check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Skip the authenticated balance request
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for `fairquote smoke`.
#[derive(Parser, Debug)]
pub struct SmokeArgs {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Market to test against (skips discovery)
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Seconds to wait for both sides to rest
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,
}
