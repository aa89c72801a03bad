//! Player commands, turn records and engine errors.
//!
//! A [`TurnResult`] is the single record every transition produces: the
//! presentation layer renders it and the history store persists it as one
//! move.

use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::phases::{Outcome, Phase};
use super::types::{PlayerId, RollOutcome};

/// What a player chooses to do on their turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    /// Throw the dice and add the total to the score.
    #[display("roll")]
    Roll,
    /// Keep the current score and hand the turn over.
    #[display("pass")]
    Pass,
}

/// Category of a transition, independent of how it is worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnEvent {
    /// Roll added points; the game goes on.
    Rolled,
    /// A lone die showed 1; the roller loses.
    RolledOne,
    /// The roll pushed the score past the target; the roller loses.
    BustedOverTarget,
    /// The roll landed exactly on the target; the roller wins.
    ExactWin,
    /// The player passed; the game goes on.
    Passed,
    /// Second consecutive pass with equal scores.
    TieAtPass,
    /// Second consecutive pass; the higher score wins.
    HigherScoreWinsAtPass,
}

impl TurnEvent {
    /// Returns true if this event ended the game.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Rolled | Self::Passed)
    }
}

/// Record of one applied action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, new)]
pub struct TurnResult {
    /// Player who acted.
    player: PlayerId,
    /// What they did.
    action: Action,
    /// Dice thrown, for rolls.
    roll: Option<RollOutcome>,
    /// The acting player's score before the action.
    score_before: u32,
    /// The acting player's score after the action.
    score_after: u32,
    /// Game phase after the action.
    phase: Phase,
    /// What happened.
    event: TurnEvent,
    /// Time the player took to decide.
    decision_time: Duration,
}

impl TurnResult {
    /// Returns true if this turn ended the game.
    pub fn is_terminal(&self) -> bool {
        self.event.is_terminal()
    }

    /// Human-readable summary for display.
    pub fn message(&self) -> String {
        let player = self.player;
        let roll = self
            .roll
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        match self.event {
            TurnEvent::Rolled => format!(
                "{} rolled {} and now has {} points.",
                player, roll, self.score_after
            ),
            TurnEvent::RolledOne => format!(
                "{} rolled an unlucky 1 and loses. {} wins!",
                player,
                player.opponent()
            ),
            TurnEvent::BustedOverTarget => format!(
                "{} rolled {} and busted with {} points. {} wins!",
                player,
                roll,
                self.score_after,
                player.opponent()
            ),
            TurnEvent::ExactWin => format!(
                "{} rolled {} and hit the target exactly. {} wins!",
                player, roll, player
            ),
            TurnEvent::Passed => format!("{} passes.", player),
            TurnEvent::TieAtPass => "Both players passed with equal scores. It's a tie!".to_string(),
            TurnEvent::HigherScoreWinsAtPass => match self.phase {
                Phase::Finished(Outcome::Winner(winner)) => {
                    format!("Both players passed. {} wins with the higher score!", winner)
                }
                _ => "Both players passed.".to_string(),
            },
        }
    }
}

/// Error returned when an action cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ActionError {
    /// The game has ended; start a new one first.
    #[display("Game is already over ({})", _0)]
    AlreadyFinished(#[error(not(source))] Outcome),
}
