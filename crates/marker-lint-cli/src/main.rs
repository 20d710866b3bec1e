//! marker-lint CLI tool.
//!
//! Usage:
//! ```bash
//! marker-lint check [OPTIONS] [PATH]
//! marker-lint list-rules
//! marker-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use marker_lint_core::Severity;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Flags references to experimental and internal APIs in symbol snapshots
#[derive(Parser)]
#[command(name = "marker-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check {
        /// Snapshot file or directory to analyze (default: `analyzer.root` or current directory)
        path: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Only flag methods whose whole override hierarchy is marked
        #[arg(long)]
        strict_hierarchy: bool,

        /// Fail instead of skipping malformed snapshots
        #[arg(long)]
        fail_on_parse_error: bool,

        /// Lowest severity that makes the command exit with code 1
        #[arg(long, default_value = "error")]
        fail_on: FailOn,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Rich diagnostics rendered by miette.
    Fancy,
}

/// Exit-code threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FailOn {
    /// Any violation fails.
    Info,
    /// Warnings and errors fail.
    Warning,
    /// Only errors fail.
    #[default]
    Error,
}

impl From<FailOn> for Severity {
    fn from(value: FailOn) -> Self {
        match value {
            FailOn::Info => Self::Info,
            FailOn::Warning => Self::Warning,
            FailOn::Error => Self::Error,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
            strict_hierarchy,
            fail_on_parse_error,
            fail_on,
        } => {
            let options = commands::check::CheckOptions {
                path,
                format,
                rules,
                exclude,
                strict_hierarchy,
                fail_on_parse_error,
                fail_on,
            };
            let project_dir = options.project_dir();
            let source = config_resolver::resolve(&project_dir, cli.config.as_deref());
            let failed = commands::check::run(options, &source)?;
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
