//! CLI entry point for the tiled wave function collapse generator

use clap::Parser;
use tiledwfc::io::cli::{Cli, Runner};
use tracing_subscriber::EnvFilter;

fn main() -> tiledwfc::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    Runner::new(cli).run().map(|_| ())
}
