//! Win detection against a configurable score threshold.

use strictly_2048::GameState;
use tracing::{debug, info, instrument};

/// Where a game stands relative to the win threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum WinStatus {
    /// Threshold not reached yet.
    #[default]
    Playing,
    /// Threshold reached and the player has not answered yet.
    WonPending,
    /// Player chose to continue past the win.
    KeepGoing,
}

/// Tracks whether the current game has been won.
///
/// The win is reported once per game. After the player keeps going it is
/// never reported again until [`WinTracker::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinTracker {
    threshold: u64,
    status: WinStatus,
}

impl WinTracker {
    /// Creates a tracker for `threshold`.
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            status: WinStatus::Playing,
        }
    }

    /// Score needed to win.
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Current status.
    pub fn status(&self) -> WinStatus {
        self.status
    }

    /// Checks `state` against the threshold.
    #[instrument(skip(self, state), fields(score = state.score(), threshold = self.threshold))]
    pub fn observe(&mut self, state: &GameState) -> WinStatus {
        if self.status == WinStatus::Playing && state.score() >= self.threshold {
            info!("Win threshold reached");
            self.status = WinStatus::WonPending;
        }
        self.status
    }

    /// Dismisses a pending win and continues the same game.
    pub fn keep_going(&mut self) {
        if self.status == WinStatus::WonPending {
            debug!("Continuing past win");
            self.status = WinStatus::KeepGoing;
        }
    }

    /// Forgets the win, for a new or restored game.
    pub fn reset(&mut self) {
        self.status = WinStatus::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use strictly_2048::Board;

    fn scored(score: u64) -> GameState {
        let board = Board::initialize(2, 2, &mut StdRng::seed_from_u64(5));
        GameState::with_board(board, score, score)
    }

    #[test]
    fn test_below_threshold_keeps_playing() {
        let mut tracker = WinTracker::new(144);
        assert_eq!(tracker.observe(&scored(140)), WinStatus::Playing);
    }

    #[test]
    fn test_reaching_threshold_wins() {
        let mut tracker = WinTracker::new(144);
        assert_eq!(tracker.observe(&scored(144)), WinStatus::WonPending);
        assert_eq!(tracker.observe(&scored(200)), WinStatus::WonPending);
    }

    #[test]
    fn test_keep_going_is_not_reshown() {
        let mut tracker = WinTracker::new(144);
        tracker.observe(&scored(150));
        tracker.keep_going();
        assert_eq!(tracker.observe(&scored(400)), WinStatus::KeepGoing);
    }

    #[test]
    fn test_keep_going_before_win_does_nothing() {
        let mut tracker = WinTracker::new(144);
        tracker.keep_going();
        assert_eq!(tracker.status(), WinStatus::Playing);
    }

    #[test]
    fn test_reset_rearms() {
        let mut tracker = WinTracker::new(144);
        tracker.observe(&scored(150));
        tracker.keep_going();
        tracker.reset();
        assert_eq!(tracker.observe(&scored(10)), WinStatus::Playing);
        assert_eq!(tracker.observe(&scored(144)), WinStatus::WonPending);
    }
}
