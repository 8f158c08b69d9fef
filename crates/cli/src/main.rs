//! Sitecheck CLI - Main Entry Point
//!
//! Command-line interface for running UI verification scenarios against a
//! locally served site and rendering the resulting reports.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{baseline, list, report, run, status};
use sitecheck_common::SiteConfig;

/// Sitecheck - scenario-driven UI verification runner
#[derive(Parser)]
#[command(name = "sitecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the configuration file (default: ./sitecheck.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the site under test
    #[arg(long, global = true, env = "SITECHECK_BASE_URL")]
    base_url: Option<String>,

    /// Output format for listings
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scenarios and write report artifacts
    Run(run::RunArgs),

    /// List the merged scenario registry
    List(list::ListArgs),

    /// Re-render Markdown/HTML artifacts from a prior JSON report
    Report(report::ReportArgs),

    /// Manage visual baselines
    #[command(subcommand)]
    Baseline(baseline::BaselineCommands),

    /// Probe the site under test once
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    // Exit codes: 0 all checks passed, 1 check failure, 2 harness error
    let code = match dispatch(cli).await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            output::print_error(&format!("{e:#}"));
            2
        }
    };

    std::process::exit(code);
}

async fn dispatch(cli: Cli) -> anyhow::Result<bool> {
    let mut config = SiteConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Commands::Run(args) => run::execute(args, config).await,
        Commands::List(args) => list::execute(args, config, cli.format),
        Commands::Report(args) => report::execute(args, config),
        Commands::Baseline(cmd) => baseline::execute(cmd, config),
        Commands::Status => status::execute(config).await,
    }
}
