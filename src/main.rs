//! docprint: print-ready PDF manuals from a versioned documentation site.
//!
//! - `build`: render every document, guide and version to PDF
//! - `plan`: list the jobs a build would run, in processing order

mod commands;
mod error;

use crate::commands::BuildArgs;
use clap::{Parser, Subcommand};
use docprint_config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docprint", version, about)]
struct Cli {
    /// Configuration file (default: docprint.toml, then the user config directory).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render all PDFs.
    Build(BuildArgs),
    /// List planned render jobs without rendering.
    Plan,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = ?err, "Configuration rejected");
            return ExitCode::FAILURE;
        },
    };

    match cli.command {
        Commands::Plan => match commands::plan(&config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                tracing::error!(error = ?err, "Planning failed");
                ExitCode::FAILURE
            },
        },
        Commands::Build(args) => match commands::build(&config, &args).await {
            Ok(report) => {
                println!(
                    "{} rendered, {} failed, {} skipped, {} page numbers unresolved",
                    report.completed.len(),
                    report.failed.len(),
                    report.skipped,
                    report.unresolved()
                );
                for failure in &report.failed {
                    eprintln!("failed: {}", failure.target.display());
                }
                if report.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
            },
            Err(err) => {
                tracing::error!(error = ?err, "Build failed");
                ExitCode::FAILURE
            },
        },
    }
}
