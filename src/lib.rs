//! Lucky Dice - a two-player push-your-luck dice game
//!
//! Players take turns rolling toward a target score. Landing on it exactly
//! wins, going over loses, and a single die showing 1 loses on the spot.
//!
//! # Architecture
//!
//! - **Games**: the rules engine ([`GameEngine`]) with its dice, scores and
//!   performance metrics, free of any I/O
//! - **Session**: [`DiceSession`] wires an engine to a clock and a
//!   [`HistoryStore`], recording each finished game
//! - **Db**: SQLite game history via diesel ([`HistoryRepository`])
//! - **Tui**: ratatui front end ([`run_tui`])
//! - **Simulation**: headless bot games ([`simulate_batch`])
//!
//! # Example
//!
//! ```
//! use lucky_dice::{Action, GameEngine, GameSettings, ScriptedRolls};
//! use std::time::Duration;
//!
//! let mut engine = GameEngine::new(
//!     GameSettings::default(),
//!     ScriptedRolls::new([5, 1]),
//!     Duration::ZERO,
//! );
//! let turn = engine.apply_action(Action::Roll, Duration::from_secs(2))?;
//! assert_eq!(*turn.score_after(), 5);
//! # Ok::<(), lucky_dice::ActionError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod app_config;
mod db;
mod games;
mod session;
mod simulation;
mod tui;

// Crate-level exports - Configuration
pub use app_config::{AppConfig, ConfigError, DEFAULT_DB_PATH};

// Crate-level exports - Database
pub use db::{
    DbError, GameRecord, HistoryRepository, HistoryStore, MIGRATIONS, MoveRecord, NewGameRecord,
    NewMoveRecord, PlayerStats,
};

// Crate-level exports - Session management
pub use session::{DiceSession, PersistenceStatus, TurnUpdate};

// Crate-level exports - Simulation
pub use simulation::{HoldAtPolicy, SimulatedGame, SimulationSummary, simulate_batch, simulate_game};

// Crate-level exports - Terminal UI
pub use tui::{
    App, GameScreen, HISTORY_LIMIT, HistoryScreen, Screen, ScreenTransition, SettingsScreen,
    run_tui,
};

// Crate-level exports - Game types (lucky dice)
pub use games::lucky_dice::{
    Action, ActionError, AlternatingTurnInvariant, Clock, ConfigIssue, DEFAULT_DICE_COUNT,
    DEFAULT_FACE_COUNT, DEFAULT_RISK_THRESHOLD, DEFAULT_TARGET_SCORE, Dice, DiceConfig,
    GameEngine, GameFinished, GameInProgress, GameResult, GameSettings, GameSnapshot, Invariant,
    InvariantSet, InvariantViolation, LuckyDiceInvariants, MAX_DICE_COUNT, MAX_FACE_COUNT,
    MAX_TARGET_SCORE, ManualClock, MetricsSnapshot,
    MonotonicClock, Normalized, Outcome, PerformanceMetrics, Phase, PlayerId, RandomSource,
    RiskThreshold, RngSource, RollOutcome, ScoreTracker, ScoresBelowTargetInvariant,
    ScriptedRolls, Transition, TurnEvent, TurnResult,
};
