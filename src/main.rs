//! Skirmish CLI - run grid battles and search for winning attack powers.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Skirmish - a deterministic Elves versus Goblins combat simulator
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single battle
    Run {
        /// Map file
        #[arg(required = true)]
        map: PathBuf,

        /// Elf attack power (default: 3)
        #[arg(long, default_value = "3")]
        elf_power: i32,

        /// Goblin attack power (default: 3)
        #[arg(long, default_value = "3")]
        goblin_power: i32,

        /// Starting hit points of every unit (default: 200)
        #[arg(long, default_value = "200")]
        hit_points: i32,

        /// Round limit before the battle counts as stuck (default: 10000)
        #[arg(long, default_value = "10000")]
        max_rounds: u32,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Print the board after every round
        #[arg(short, long)]
        rounds: bool,

        /// Log moves and attacks to stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// Find the lowest attack power that wins without losses
    Search {
        /// Map file
        #[arg(required = true)]
        map: PathBuf,

        /// Faction whose attack power is raised (default: elf)
        #[arg(long, default_value = "elf")]
        faction: cli::FactionArg,

        /// First candidate power (default: 4)
        #[arg(long, default_value = "4")]
        min_power: i32,

        /// Last candidate power (default: 200)
        #[arg(long, default_value = "200")]
        max_power: i32,

        /// Candidates evaluated in parallel per batch (default: 8)
        #[arg(short, long, default_value = "8")]
        batch: usize,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,

        /// Log every trial to stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print both answers for a map with default settings
    Solve {
        /// Map file
        #[arg(required = true)]
        map: PathBuf,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the default level.
fn init_tracing(verbose: bool) {
    let level = if verbose { "skirmish=debug" } else { "skirmish=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    let verbose = match &args.command {
        Commands::Run { verbose, .. } | Commands::Search { verbose, .. } => *verbose,
        Commands::Solve { .. } => false,
    };
    init_tracing(verbose);

    let result = match args.command {
        Commands::Run {
            map,
            elf_power,
            goblin_power,
            hit_points,
            max_rounds,
            format,
            rounds,
            verbose: _,
        } => {
            let config = skirmish::BattleConfig {
                hit_points,
                elf_power,
                goblin_power,
                max_rounds,
            };
            cli::run::execute(&map, &config, format, rounds)
        }

        Commands::Search {
            map,
            faction,
            min_power,
            max_power,
            batch,
            threads,
            format,
            progress,
            verbose: _,
        } => {
            let search = skirmish::SearchConfig {
                faction: faction.into(),
                min_power,
                max_power,
                batch_size: batch,
            };
            cli::search::execute(&map, &search, threads, format, progress)
        }

        Commands::Solve { map } => cli::solve::execute(&map),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
