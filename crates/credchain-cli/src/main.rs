//! # credchain CLI entry point
//!
//! Parses command-line arguments, loads configuration, and dispatches to
//! the subcommand handlers on a Tokio runtime.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use credchain_cli::config::CliConfig;
use credchain_cli::credential::{run_issue, run_verify, IssueArgs, VerifyArgs};
use credchain_cli::keys::{run_keygen, KeygenArgs};
use credchain_cli::presentation::{
    run_present, run_verify_presentation, PresentArgs, VerifyPresentationArgs,
};

/// Issue and verify delegated credentials.
#[derive(Parser, Debug)]
#[command(name = "credchain", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an Ed25519 signing key.
    Keygen(KeygenArgs),

    /// Sign a credential.
    Issue(IssueArgs),

    /// Verify a credential and its chain.
    Verify(VerifyArgs),

    /// Sign a presentation of one or more credentials.
    Present(PresentArgs),

    /// Verify a presentation.
    VerifyPresentation(VerifyPresentationArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "credchain starting");

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Keygen(args) => run_keygen(&args, &config),
            Commands::Issue(args) => run_issue(&args, &config).await,
            Commands::Verify(args) => run_verify(&args, &config).await,
            Commands::Present(args) => run_present(&args, &config).await,
            Commands::VerifyPresentation(args) => run_verify_presentation(&args, &config).await,
        }
    })
}
