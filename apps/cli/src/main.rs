//! steamclean entry point.

mod app;
mod config;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Find installer and redistributable files left behind in Steam libraries.
#[derive(Debug, Parser)]
#[command(name = "steamclean", version, about)]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Steam installation directory; skips registry lookup.
    #[arg(long, value_name = "PATH")]
    pub install_path: Option<PathBuf>,

    /// Additional library directory to scan (repeatable).
    #[arg(short, long = "library", value_name = "PATH")]
    pub libraries: Vec<PathBuf>,

    /// List candidates without deleting anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Delete without asking for confirmation.
    #[arg(short, long)]
    pub yes: bool,

    /// Print the candidate report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the report on stdout stays machine-readable.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting steamclean");

    let config = config::Config::load(cli.config.as_deref())?.merge_cli(&cli);
    app::run(&config, cli.yes, cli.json)
}
