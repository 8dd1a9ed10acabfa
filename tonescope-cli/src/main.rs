//! Tonescope CLI - runs the interference pipeline on WAV files.

mod audio;
mod commands;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tonescope")]
#[command(author, version, about = "Tonal interference detection and filtering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inject a tone into a WAV segment, detect it and filter it out
    Analyze(commands::analyze::AnalyzeArgs),

    /// Design a filter and print its coefficients and metrics
    Design(commands::design::DesignArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Design(args) => commands::design::run(args),
    }
}
