//! First-class input events and the reducer that applies them.
//!
//! Events are what a front end sends: swipes, a new game, or a restored
//! save. `GameState::update` folds one event into the next state.

use crate::snapshot::{SavedGame, SnapshotError};
use crate::state::GameState;
use crate::types::Direction;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// An input from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum GameEvent {
    /// Swipe toward the top edge.
    SwipeUp,
    /// Swipe toward the bottom edge.
    SwipeDown,
    /// Swipe toward the left edge.
    SwipeLeft,
    /// Swipe toward the right edge.
    SwipeRight,
    /// Start a fresh game, keeping the best score.
    StartGame,
    /// Replace the game with a persisted one.
    #[display("RestoreFromPersisted")]
    RestoreFromPersisted(SavedGame),
}

impl GameEvent {
    /// The swipe event for `direction`.
    pub fn swipe(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::SwipeUp,
            Direction::Down => Self::SwipeDown,
            Direction::Left => Self::SwipeLeft,
            Direction::Right => Self::SwipeRight,
        }
    }

    /// The swipe direction, if this is a swipe.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::SwipeUp => Some(Direction::Up),
            Self::SwipeDown => Some(Direction::Down),
            Self::SwipeLeft => Some(Direction::Left),
            Self::SwipeRight => Some(Direction::Right),
            Self::StartGame | Self::RestoreFromPersisted(_) => None,
        }
    }
}

impl GameState {
    /// Applies `event` and returns the resulting state.
    ///
    /// Swipes always spawn a tile when they change the board. A restored save
    /// is read against the current board dimensions.
    ///
    /// # Errors
    ///
    /// Only [`GameEvent::RestoreFromPersisted`] can fail, when the saved
    /// board is malformed. The current state is left untouched in that case.
    #[instrument(skip(self, rng), fields(event = %event))]
    pub fn update<R: Rng + ?Sized>(
        &self,
        event: &GameEvent,
        rng: &mut R,
    ) -> Result<Self, SnapshotError> {
        debug!("Applying event");
        match event {
            GameEvent::StartGame => Ok(self.start_game(rng)),
            GameEvent::RestoreFromPersisted(saved) => {
                let board = saved.to_board(self.rows(), self.cols(), rng)?;
                Ok(self.load_from_external_data(board, saved.score, saved.best_score))
            }
            GameEvent::SwipeUp => Ok(self.swipe(Direction::Up, true, rng)),
            GameEvent::SwipeDown => Ok(self.swipe(Direction::Down, true, rng)),
            GameEvent::SwipeLeft => Ok(self.swipe(Direction::Left, true, rng)),
            GameEvent::SwipeRight => Ok(self.swipe(Direction::Right, true, rng)),
        }
    }
}
