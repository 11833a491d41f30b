use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pawns_history::corpus::analyse_path;
use tracing_subscriber::EnvFilter;

/// Replays every game of a PGN file (or of the .pgn files in a directory)
/// and reports how the pawns fared.
#[derive(Parser)]
#[command(name = "pawns-history")]
#[command(about = "Pawn statistics from replayed PGN games")]
#[command(version)]
struct Args {
    /// PGN file, or a directory scanned (non-recursively) for .pgn files
    #[arg(value_name = "PATH")]
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let statistics = analyse_path(&args.path)
        .with_context(|| format!("failed to analyse {}", args.path.display()))?;

    print!("{statistics}");

    Ok(())
}
