//! Lucky dice: a two-player push-your-luck race to an exact target score.
//!
//! Players alternate turns. Each turn the current player either rolls the
//! dice, adding their total, or passes. Landing on the target wins, going
//! over loses, and a lone die showing 1 loses on the spot.

mod action;
mod dice;
mod engine;
mod invariants;
mod metrics;
mod phases;
mod scores;
mod settings;
mod types;
mod typestate;

pub use action::{Action, ActionError, TurnEvent, TurnResult};
pub use dice::{Dice, RandomSource, RngSource, ScriptedRolls};
pub use engine::{GameEngine, GameSnapshot};
pub use invariants::{
    AlternatingTurnInvariant, Invariant, InvariantSet, InvariantViolation, LuckyDiceInvariants,
    ScoresBelowTargetInvariant,
};
pub use metrics::{Clock, ManualClock, MetricsSnapshot, MonotonicClock, PerformanceMetrics};
pub use phases::{Outcome, Phase};
pub use scores::ScoreTracker;
pub use settings::{DEFAULT_RISK_THRESHOLD, GameSettings, RiskThreshold};
pub use types::{
    ConfigIssue, DEFAULT_DICE_COUNT, DEFAULT_FACE_COUNT, DEFAULT_TARGET_SCORE, DiceConfig,
    MAX_DICE_COUNT, MAX_FACE_COUNT, MAX_TARGET_SCORE, Normalized, PlayerId, RollOutcome,
};
pub use typestate::{GameFinished, GameInProgress, GameResult, Transition};
