//! Command entry points tying config, session, save file and terminal
//! together.

use crate::config::GameConfig;
use crate::session::{GameSession, SessionError, SessionHandle};
use crate::simulate::{SimulationReport, simulate};
use crate::store::SaveStore;
use crate::terminal;
use anyhow::Result;
use strictly_2048::{GameEvent, SavedGame};
use tracing::{debug, info, instrument, warn};

/// Resumes the saved game if there is a usable one, otherwise starts fresh.
///
/// Returns true when a save was resumed. An unreadable or invalid save is
/// logged and replaced by a new game.
#[instrument(skip_all, fields(path = %store.path().display()))]
pub async fn resume_or_start(
    handle: &SessionHandle,
    store: &SaveStore,
) -> Result<bool, SessionError> {
    match store.load() {
        Ok(Some(saved)) => match handle.apply(GameEvent::RestoreFromPersisted(saved)).await {
            Ok(view) => {
                info!(score = view.state().score(), "Resumed saved game");
                return Ok(true);
            }
            Err(e) => warn!(error = %e, "Saved game rejected, starting fresh"),
        },
        Ok(None) => debug!("No saved game, starting fresh"),
        Err(e) => warn!(error = %e, "Could not read saved game, starting fresh"),
    }
    handle.apply(GameEvent::StartGame).await?;
    Ok(false)
}

/// Plays interactively, saving on exit.
#[instrument(skip_all, fields(rows = config.rows(), cols = config.cols()))]
pub async fn run_play(config: GameConfig) -> Result<()> {
    info!("Starting strictly 2048");
    let store = SaveStore::new(config.save_path().clone());
    let handle = GameSession::spawn(&config);
    resume_or_start(&handle, &store).await?;

    let res = terminal::run(&handle).await;

    let final_state = handle.shutdown().await?;
    store.save(&SavedGame::from_state(&final_state))?;
    res
}

/// Plays `games` random games and prints one line per game.
#[instrument(skip(config))]
pub fn run_simulate(config: &GameConfig, games: u64, max_moves: u64) -> Vec<SimulationReport> {
    let reports = simulate(config, games, max_moves);
    for report in &reports {
        println!("{}", report);
    }
    if let Some(best) = reports.iter().max_by_key(|r| *r.score()) {
        println!("best: {}", best);
    }
    reports
}

/// Prints the saved game, if any.
#[instrument(skip(config))]
pub fn run_show(config: &GameConfig) -> Result<()> {
    let store = SaveStore::new(config.save_path().clone());
    let mut rng = config.rng();
    match store.load_state(*config.rows(), *config.cols(), &mut rng)? {
        Some(state) => {
            println!("{}", state.board());
            println!();
            println!("Score {}   Best {}", state.score(), state.best_score());
            if state.has_lost() {
                println!("Game over");
            }
        }
        None => println!("No saved game at {}", store.path().display()),
    }
    Ok(())
}
