//! Headless solver
//!
//! Reads a grid file and prints either the number of distinct cells the actor visits
//! (variant 1) or the number of single-obstacle placements that trap it in a loop (variant 2).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use patrolgrid::{solve_file, Config, Variant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "solve")]
#[command(about = "Simulate a guard patrol over a text grid and print the answer")]
struct Args {
    /// Puzzle variant: 1 (visited) or 2 (loops)
    variant: Variant,

    /// Grid file to read
    file: PathBuf,

    /// Configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Run loop-search trials one at a time instead of on the thread pool
    #[arg(long)]
    sequential: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let (mut config, config_error) = match Config::load_from(&args.config) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = config_error {
        tracing::warn!("Failed to load {}: {}; using default configuration", args.config.display(), e);
    }

    if args.sequential {
        config.analysis.parallel = false;
    }

    match solve_file(&args.file, args.variant, &config) {
        Ok(answer) => {
            println!("{}", answer);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
