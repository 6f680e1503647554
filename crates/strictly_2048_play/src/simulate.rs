//! Headless games driven by random legal moves.

use crate::config::GameConfig;
use derive_getters::Getters;
use rand::{Rng, SeedableRng, rngs::StdRng};
use strictly_2048::{Direction, GameState};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

/// Outcome of one simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SimulationReport {
    /// Seed the game was played with.
    seed: u64,
    /// Board-changing moves made.
    moves: u64,
    /// Final score.
    score: u64,
    /// Largest tile on the final board.
    best_tile: u32,
    /// Whether the score reached the win threshold.
    won: bool,
    /// Whether the game ended with no move left.
    lost: bool,
}

impl std::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "seed {}: score {}, best tile {}, {} moves",
            self.seed, self.score, self.best_tile, self.moves
        )?;
        if self.won {
            write!(f, ", won")?;
        }
        if !self.lost {
            write!(f, ", stopped at move limit")?;
        }
        Ok(())
    }
}

/// Plays one game on the configured board until it is lost or `max_moves`
/// moves have been made.
///
/// Each turn picks uniformly among the directions that change the board.
#[instrument(skip(config), fields(rows = config.rows(), cols = config.cols()))]
pub fn simulate_game(config: &GameConfig, seed: u64, max_moves: u64) -> SimulationReport {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::new(*config.rows(), *config.cols(), &mut rng).start_game(&mut rng);
    let mut moves = 0;

    while !state.has_lost() && moves < max_moves {
        let legal: Vec<Direction> = Direction::iter()
            .filter(|&direction| state.swipe(direction, false, &mut rng) != state)
            .collect();
        if legal.is_empty() {
            break;
        }
        let direction = legal[rng.random_range(0..legal.len())];
        state = state.swipe(direction, true, &mut rng);
        moves += 1;
        debug!(moves, %direction, score = state.score(), "Simulated move");
    }

    let report = SimulationReport {
        seed,
        moves,
        score: state.score(),
        best_tile: state.board().max_tile(),
        won: state.score() >= *config.win_score(),
        lost: state.has_lost(),
    };
    info!(%report, "Simulation finished");
    report
}

/// Plays `games` games with consecutive seeds starting at the configured
/// seed, or 0 when none is set.
pub fn simulate(config: &GameConfig, games: u64, max_moves: u64) -> Vec<SimulationReport> {
    let base = config.seed().unwrap_or(0);
    (0..games)
        .map(|i| simulate_game(config, base.wrapping_add(i), max_moves))
        .collect()
}
