mod cli;
mod commands;
mod shapes;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // RUST_LOG wins; otherwise info for our own crates
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rmscene=info,rmscene_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::New(args) => commands::new::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
    }
}
