//! Phase-specific typestate structs for lucky dice.
//!
//! Each phase is its own type: only a [`GameInProgress`] can roll or pass,
//! and a [`GameFinished`] always carries an [`Outcome`].

use tracing::{debug, instrument};

use super::action::TurnEvent;
use super::invariants::{InvariantSet, LuckyDiceInvariants};
use super::phases::{Outcome, Phase};
use super::scores::ScoreTracker;
use super::types::{PlayerId, RollOutcome};

// ─────────────────────────────────────────────────────────────
//  InProgress Phase
// ─────────────────────────────────────────────────────────────

/// Game in progress - accepts rolls and passes.
///
/// Invariants:
/// - both scores are below the target
/// - the current player alternates once per completed turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInProgress {
    pub(super) scores: ScoreTracker,
    pub(super) target_score: u32,
    pub(super) round_count: u32,
    pub(super) pass_streak: u32,
}

impl GameInProgress {
    /// Starts a game: both scores zero, Player 1 to act.
    #[instrument]
    pub fn new(target_score: u32) -> Self {
        Self {
            scores: ScoreTracker::new(),
            target_score,
            round_count: 0,
            pass_streak: 0,
        }
    }

    /// The player to act.
    pub fn current_player(&self) -> PlayerId {
        self.scores.current_player()
    }

    /// Score table.
    pub fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    /// Score to land on exactly.
    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    /// Completed turns so far.
    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    /// Passes made in a row, reset by any roll.
    pub fn pass_streak(&self) -> u32 {
        self.pass_streak
    }

    /// Applies a throw of the dice for the current player.
    ///
    /// A lone 1 loses immediately with the score untouched. Otherwise the
    /// total is added: overshooting the target loses, hitting it exactly wins.
    #[instrument(skip(self), fields(player = %self.current_player(), score = self.scores.current_score()))]
    pub fn roll(self, outcome: &RollOutcome) -> Transition {
        let mut game = self;
        game.pass_streak = 0;
        let roller = game.scores.current_player();

        if outcome.is_instant_loss() {
            debug!("Rolled a 1");
            return game.finish(Outcome::Winner(roller.opponent()), TurnEvent::RolledOne);
        }

        game.scores.add_points(outcome.total());
        let score = game.scores.current_score();

        if score > game.target_score {
            debug!(score, "Busted over target");
            return game.finish(Outcome::Winner(roller.opponent()), TurnEvent::BustedOverTarget);
        }

        if score == game.target_score {
            debug!(score, "Hit target exactly");
            return game.finish(Outcome::Winner(roller), TurnEvent::ExactWin);
        }

        game.complete_turn();
        Transition::continuing(game, TurnEvent::Rolled)
    }

    /// Passes the turn without rolling.
    ///
    /// The second pass in a row ends the game when both players have scored;
    /// the higher score wins and equal scores tie.
    #[instrument(skip(self), fields(player = %self.current_player(), streak = self.pass_streak))]
    pub fn pass(self) -> Transition {
        let mut game = self;
        let both_scored = PlayerId::ALL
            .iter()
            .all(|player| game.scores.score(*player) > 0);

        game.pass_streak += 1;

        if game.pass_streak >= 2 && both_scored {
            let one = game.scores.score(PlayerId::One);
            let two = game.scores.score(PlayerId::Two);
            debug!(one, two, "Consecutive passes end the game");
            return match one.cmp(&two) {
                std::cmp::Ordering::Greater => game.finish(
                    Outcome::Winner(PlayerId::One),
                    TurnEvent::HigherScoreWinsAtPass,
                ),
                std::cmp::Ordering::Less => game.finish(
                    Outcome::Winner(PlayerId::Two),
                    TurnEvent::HigherScoreWinsAtPass,
                ),
                std::cmp::Ordering::Equal => game.finish(Outcome::Tie, TurnEvent::TieAtPass),
            };
        }

        game.complete_turn();
        Transition::continuing(game, TurnEvent::Passed)
    }

    fn complete_turn(&mut self) {
        self.round_count += 1;
        self.scores.switch_player();
        debug_assert!(
            LuckyDiceInvariants::check_all(self).is_ok(),
            "Invariant violated after turn"
        );
    }

    fn finish(self, outcome: Outcome, event: TurnEvent) -> Transition {
        Transition {
            next: GameResult::Finished(GameFinished {
                scores: self.scores,
                target_score: self.target_score,
                round_count: self.round_count,
                outcome,
            }),
            event,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Finished Phase
// ─────────────────────────────────────────────────────────────

/// Game finished - outcome determined.
///
/// Scores are kept as they stood at the end, including any overshoot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFinished {
    scores: ScoreTracker,
    target_score: u32,
    round_count: u32,
    outcome: Outcome,
}

impl GameFinished {
    /// Returns the outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Final score table.
    pub fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    /// Target the game was played to.
    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    /// Completed turns before the final action.
    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    /// Starts a fresh game to the same target (consumes finished).
    #[instrument(skip(self))]
    pub fn restart(self) -> GameInProgress {
        GameInProgress::new(self.target_score)
    }
}

// ─────────────────────────────────────────────────────────────
//  Result Types
// ─────────────────────────────────────────────────────────────

/// Either phase of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameResult {
    /// Game continues.
    InProgress(GameInProgress),
    /// Game finished.
    Finished(GameFinished),
}

impl GameResult {
    /// Score table in either phase.
    pub fn scores(&self) -> &ScoreTracker {
        match self {
            GameResult::InProgress(game) => game.scores(),
            GameResult::Finished(game) => game.scores(),
        }
    }

    /// Completed turns in either phase.
    pub fn round_count(&self) -> u32 {
        match self {
            GameResult::InProgress(game) => game.round_count(),
            GameResult::Finished(game) => game.round_count(),
        }
    }

    /// Target score in either phase.
    pub fn target_score(&self) -> u32 {
        match self {
            GameResult::InProgress(game) => game.target_score(),
            GameResult::Finished(game) => game.target_score(),
        }
    }

    /// Phase summary.
    pub fn phase(&self) -> Phase {
        match self {
            GameResult::InProgress(_) => Phase::Active,
            GameResult::Finished(game) => Phase::Finished(*game.outcome()),
        }
    }
}

/// The state after an action and what the action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State the game moved to.
    pub next: GameResult,
    /// Category of the transition.
    pub event: TurnEvent,
}

impl Transition {
    fn continuing(game: GameInProgress, event: TurnEvent) -> Self {
        Self {
            next: GameResult::InProgress(game),
            event,
        }
    }
}
