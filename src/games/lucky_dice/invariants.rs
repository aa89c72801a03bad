//! Properties every in-progress game must satisfy.
//!
//! Checked in debug builds after each transition that keeps the game going.

use super::typestate::GameInProgress;
use super::types::PlayerId;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
pub trait InvariantSet<S> {
    /// Returns every violated invariant, or `Ok(())` if all hold.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// While a game is running neither score has reached the target.
pub struct ScoresBelowTargetInvariant;

impl Invariant<GameInProgress> for ScoresBelowTargetInvariant {
    fn holds(game: &GameInProgress) -> bool {
        game.scores()
            .scores()
            .iter()
            .all(|score| *score < game.target_score())
    }

    fn description() -> &'static str {
        "Both scores stay below the target while the game is active"
    }
}

/// Every completed turn hands over the dice, so Player 1 acts on even rounds.
pub struct AlternatingTurnInvariant;

impl Invariant<GameInProgress> for AlternatingTurnInvariant {
    fn holds(game: &GameInProgress) -> bool {
        let expected = if game.round_count() % 2 == 0 {
            PlayerId::One
        } else {
            PlayerId::Two
        };
        game.current_player() == expected
    }

    fn description() -> &'static str {
        "Players alternate once per completed turn"
    }
}

/// All lucky dice invariants as a composable set.
pub type LuckyDiceInvariants = (ScoresBelowTargetInvariant, AlternatingTurnInvariant);
