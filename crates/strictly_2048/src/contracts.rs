//! Contract-based validation for board transitions.
//!
//! Contracts formalize Hoare-style reasoning: {P} transition {Q}. Engine
//! transitions cannot fail on reachable states, so contracts only carry
//! postconditions and run in debug builds.

use crate::invariants::InvariantViolation;
use crate::state::GameState;
use tracing::{instrument, warn};

/// Postcondition over a state transition.
pub trait Contract<S> {
    /// Checks that `after` is a lawful successor of `before`.
    fn post(before: &S, after: &S) -> Result<(), InvariantViolation>;
}

/// Postcondition: sliding and merging neither create nor destroy value.
pub struct TileSumPreserved;

impl TileSumPreserved {
    /// Returns true when both boards hold the same total.
    #[instrument(skip_all)]
    pub fn holds(before: &GameState, after: &GameState) -> bool {
        let (was, now) = (before.board().tile_sum(), after.board().tile_sum());
        if was != now {
            warn!(was, now, "Tile sum changed across swipe");
        }
        was == now
    }
}

/// Postcondition: the score grew by exactly the merge results.
///
/// Each merge target holds its merge result after the swipe and no cell is a
/// target twice, so the board values at the targets sum to the gain.
pub struct ScoreMatchesMerges;

impl ScoreMatchesMerges {
    /// Returns true when the score delta equals the merged tile total.
    #[instrument(skip_all)]
    pub fn holds(before: &GameState, after: &GameState) -> bool {
        let merged: u64 = after
            .merged_positions()
            .iter()
            .map(|&pos| u64::from(after.board().value(pos)))
            .sum();
        let delta = after.score().saturating_sub(before.score());
        if merged != delta || delta != after.added_score() {
            warn!(merged, delta, "Score delta disagrees with merges");
            return false;
        }
        true
    }
}

/// Contract for a swipe, checked before any tile is spawned.
pub struct SwipeContract;

impl Contract<GameState> for SwipeContract {
    fn post(before: &GameState, after: &GameState) -> Result<(), InvariantViolation> {
        if !TileSumPreserved::holds(before, after) {
            return Err(InvariantViolation::new("Swipe changed the tile sum"));
        }
        if !ScoreMatchesMerges::holds(before, after) {
            return Err(InvariantViolation::new(
                "Swipe score delta differs from merge results",
            ));
        }
        Ok(())
    }
}
