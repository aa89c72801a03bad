//! Game phase and outcome types.

use serde::{Deserialize, Serialize};

use super::types::PlayerId;

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player won the game.
    Winner(PlayerId),
    /// Both players passed with equal scores.
    Tie,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Tie => None,
        }
    }

    /// Returns true if the game was tied.
    pub fn is_tie(&self) -> bool {
        matches!(self, Outcome::Tie)
    }

    /// Winner as stored in the history database: 0 for a tie, else the seat number.
    pub fn winner_code(&self) -> i32 {
        self.winner().map(PlayerId::number).unwrap_or(0)
    }

    /// Parses a stored winner code.
    pub fn from_winner_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Outcome::Tie),
            other => PlayerId::from_number(other).map(Outcome::Winner),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "{} wins", player),
            Outcome::Tie => write!(f, "Tie"),
        }
    }
}

/// Phase a game is in after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Actions are accepted.
    Active,
    /// The game is over.
    Finished(Outcome),
}

impl Phase {
    /// Returns the outcome once finished.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Phase::Active => None,
            Phase::Finished(outcome) => Some(*outcome),
        }
    }

    /// Returns true if the game is over.
    pub fn is_finished(&self) -> bool {
        matches!(self, Phase::Finished(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_codes() {
        assert_eq!(Outcome::Tie.winner_code(), 0);
        assert_eq!(Outcome::Winner(PlayerId::One).winner_code(), 1);
        assert_eq!(Outcome::from_winner_code(2), Some(Outcome::Winner(PlayerId::Two)));
        assert_eq!(Outcome::from_winner_code(3), None);
    }

    #[test]
    fn test_phase_outcome() {
        assert_eq!(Phase::Active.outcome(), None);
        assert!(Phase::Finished(Outcome::Tie).is_finished());
    }
}
