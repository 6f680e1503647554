//! Strictly 2048 - terminal sliding tile game.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::{Path, PathBuf};
use strictly_2048_play::{GameConfig, run_play, run_show, run_simulate};
use tracing_subscriber::EnvFilter;

/// Log file used while the terminal is in raw mode.
const PLAY_LOG_FILE: &str = "strictly_2048.log";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_file = match (&cli.command, cli.log_file) {
        (_, Some(path)) => Some(path),
        (Command::Play, None) => Some(PathBuf::from(PLAY_LOG_FILE)),
        _ => None,
    };
    init_logging(log_file.as_deref())?;

    let config = GameConfig::resolve(cli.config.as_deref(), cli.overrides.into())?;

    match cli.command {
        Command::Play => run_play(config).await,
        Command::Simulate { games, max_moves } => {
            run_simulate(&config, games, max_moves);
            Ok(())
        }
        Command::Show => run_show(&config),
    }
}

/// Installs the fmt subscriber, on stderr or appending to `log_file`.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
