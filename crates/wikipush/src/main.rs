//! Wikipush CLI - mirrors a markdown directory tree into Confluence.
//!
//! Provides commands for:
//! - `push`: upsert a sync root into its configured space
//! - `check`: test the Confluence connection

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, PushArgs};
use output::Output;

/// Wikipush - push markdown trees to Confluence.
#[derive(Parser)]
#[command(name = "wikipush", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upsert a markdown directory into Confluence.
    Push(PushArgs),
    /// Test the Confluence connection.
    Check(CheckArgs),
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let output = Output::new();

    let result = match cli.command {
        Commands::Push(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
