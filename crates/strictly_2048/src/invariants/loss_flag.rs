//! Loss flag invariant: the flag always agrees with the board.

use super::Invariant;
use crate::rules::has_lost;
use crate::state::GameState;

/// Invariant: `has_lost` matches the loss rule evaluated on the board.
///
/// A lost board cannot change under swipes or spawns, so the flag stays set
/// until a new game starts.
pub struct LossFlagInvariant;

impl Invariant<GameState> for LossFlagInvariant {
    fn holds(state: &GameState) -> bool {
        state.has_lost() == has_lost(state.board())
    }

    fn description() -> &'static str {
        "Loss flag matches the board"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_derived_flag_holds() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = GameState::with_board(Board::from_values(&[[2, 4], [4, 2]], &mut rng), 0, 0);
        assert!(state.has_lost());
        assert!(LossFlagInvariant::holds(&state));
    }

    #[test]
    fn test_forged_flag_violates() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = GameState::with_board(Board::from_values(&[[2, 0], [4, 2]], &mut rng), 0, 0)
            .with_forged_flag(true);
        assert!(!LossFlagInvariant::holds(&state));
    }
}
