//! Garrison CLI - inspect organization trees, access scopes and gate decisions.
//!
//! Provides commands for browsing units, resolving scopes, checking page and
//! menu access, and replaying the cascading unit picker.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check, scope, select, units, Workspace};
use garrison_core::config::Config;
use garrison_core::telemetry::{init_logging, LogFormat, LoggingConfig};
use output::OutputFormat;

/// Garrison - hierarchical access control for unit dashboards
#[derive(Parser)]
#[command(
    name = "garrison",
    version = "0.1.0",
    about = "Garrison - hierarchical access control for unit dashboards",
    long_about = "CLI tool for inspecting Garrison organization trees, role scopes and access gates.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Configuration file; GARRISON__* variables apply on top
    #[arg(short, long, global = true, env = "GARRISON_CONFIG")]
    config: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Organization tree inspection
    #[command(subcommand)]
    Units(units::UnitsCommands),

    /// Resolve the units a role may see
    Scope(scope::ScopeArgs),

    /// Evaluate page, menu and unit access
    #[command(subcommand)]
    Check(check::CheckCommands),

    /// Replay picks through the cascading unit selector
    Select(select::SelectArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: Some(LogFormat::Compact),
            ansi: !cli.no_color,
            stderr: true,
            ..LoggingConfig::default()
        };
        init_logging(&logging, "development")?;
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    let ws = Workspace::new(config)?;
    let format = cli.output;

    match cli.command {
        Commands::Units(cmd) => units::execute(cmd, &ws, format),
        Commands::Scope(args) => scope::execute(args, &ws, format),
        Commands::Check(cmd) => check::execute(cmd, &ws, format),
        Commands::Select(args) => select::execute(args, &ws, format),
    }
}
