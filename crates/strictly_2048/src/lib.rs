//! Strictly 2048 - a pure, deterministic 2048 board engine
//!
//! The engine owns no I/O and no shared state. Each transition takes the
//! current [`GameState`] by reference and returns the next one; randomness
//! for spawns and tile ids comes from a caller-supplied [`rand::Rng`], so a
//! seeded generator replays a game exactly.
//!
//! # Architecture
//!
//! - **Board**: dense `rows x cols` grid of [`Cell`]s with stable [`TileId`]s
//! - **Rules**: line collapse (slide + merge) and loss detection
//! - **State**: swipes, spawns, new games and restores as value transitions
//! - **Events**: [`GameEvent`] reducer for single-writer event loops
//! - **Snapshot**: the `"row, col"` keyed [`SavedGame`] persistence shape
//!
//! # Example
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//! use strictly_2048::{Direction, GameState};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let game = GameState::new(4, 4, &mut rng).start_game(&mut rng);
//! let next = game.swipe(Direction::Left, true, &mut rng);
//! assert!(next.score() >= game.score());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod event;
mod snapshot;
mod state;
mod types;

pub mod contracts;
pub mod invariants;
pub mod rules;

pub use board::Board;
pub use event::GameEvent;
pub use snapshot::{SavedGame, SnapshotError, SnapshotErrorKind, parse_key};
pub use state::{GameState, Phase};
pub use types::{Cell, Direction, MAX_TILE, Position, TileId, is_valid_tile};
