//! Command-line interface for strictly_2048.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use strictly_2048_play::ConfigOverrides;

/// Strictly 2048 - a terminal sliding tile game
#[derive(Parser, Debug)]
#[command(name = "strictly_2048")]
#[command(about = "Slide and merge tiles in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Values that override the config file
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Config overrides
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    /// Board rows
    #[arg(long, global = true)]
    pub rows: Option<usize>,

    /// Board columns
    #[arg(long, global = true)]
    pub cols: Option<usize>,

    /// Score that counts as a win
    #[arg(long, global = true)]
    pub win_score: Option<u64>,

    /// RNG seed for reproducible games
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Save file location
    #[arg(long, global = true)]
    pub save_path: Option<PathBuf>,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            rows: args.rows,
            cols: args.cols,
            win_score: args.win_score,
            seed: args.seed,
            save_path: args.save_path,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal, resuming the saved game if there is one
    Play,

    /// Play random games headlessly and report the results
    Simulate {
        /// Number of games
        #[arg(short, long, default_value = "10")]
        games: u64,

        /// Stop a game after this many moves
        #[arg(long, default_value = "100000")]
        max_moves: u64,
    },

    /// Print the saved game
    Show,
}
