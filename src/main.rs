//! Tower Siege CLI - start, script and analyze matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Tower Siege - a two-player tower siege rules engine
#[derive(Parser, Debug)]
#[command(name = "tower-siege")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Match config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a match and print its opening state
    New {
        /// Random seed (default: from config, else random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Player 1 name
        #[arg(long, default_value = "Player 1")]
        p1: String,

        /// Player 2 name
        #[arg(long, default_value = "Player 2")]
        p2: String,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Play a command script, one command per line, for whoever is active
    Play {
        /// Script file (`move X Y`, `build mine`, `upgrade X Y`, `buy w1`,
        /// `toggle ID`, `end`, `grant p1 gold N`)
        #[arg(required = true)]
        script: PathBuf,

        /// Random seed (default: from config, else random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Only print the final state
        #[arg(short, long)]
        quiet: bool,
    },

    /// Estimate duel odds by simulation and compare with the exact formula
    Odds {
        /// Attacker power
        #[arg(required = true)]
        attacker: u32,

        /// Defender power
        #[arg(required = true)]
        defender: u32,

        /// Number of simulated duels (default: 1000000)
        #[arg(short = 'n', long, default_value = "1000000")]
        trials: u64,

        /// Starting seed (increments per chunk)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tower_siege=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match args.command {
        Commands::New {
            seed,
            p1,
            p2,
            format,
        } => cli::new::execute(args.config.as_deref(), seed, p1, p2, format),

        Commands::Play {
            script,
            seed,
            format,
            quiet,
        } => cli::play::execute(args.config.as_deref(), &script, seed, format, quiet),

        Commands::Odds {
            attacker,
            defender,
            trials,
            seed,
            threads,
            progress,
        } => cli::odds::execute(attacker, defender, trials, seed, threads, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
