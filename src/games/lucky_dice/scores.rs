//! Two-slot score table with a current-player pointer.

use serde::{Deserialize, Serialize};

use super::types::PlayerId;

/// Running scores for both players and whose turn it is.
///
/// Performs no validation: the rules in [`GameInProgress`](super::GameInProgress)
/// decide when points are added and when the turn passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreTracker {
    scores: [u32; 2],
    current: PlayerId,
}

impl ScoreTracker {
    /// Both scores at zero, Player 1 to act.
    pub fn new() -> Self {
        Self {
            scores: [0, 0],
            current: PlayerId::One,
        }
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// Score of the current player.
    pub fn current_score(&self) -> u32 {
        self.scores[self.current.index()]
    }

    /// Score of the given player.
    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores[player.index()]
    }

    /// Both scores, indexed by [`PlayerId::index`].
    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    /// Adds points to the current player.
    pub fn add_points(&mut self, points: u32) {
        let slot = &mut self.scores[self.current.index()];
        *slot = slot.saturating_add(points);
    }

    /// Hands the turn to the other player.
    pub fn switch_player(&mut self) {
        self.current = self.current.opponent();
    }
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new()
    }
}
