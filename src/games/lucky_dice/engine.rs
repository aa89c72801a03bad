//! Turn-by-turn game engine.
//!
//! [`GameEngine`] ties the typestate rules to the dice, the random source and
//! the performance metrics, behind a single [`GameEngine::apply_action`] entry
//! point. It never touches storage; see [`DiceSession`](crate::DiceSession)
//! for that.

use std::time::Duration;

use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::action::{Action, ActionError, TurnResult};
use super::dice::{Dice, RandomSource};
use super::metrics::{MetricsSnapshot, PerformanceMetrics};
use super::phases::{Outcome, Phase};
use super::settings::GameSettings;
use super::typestate::{GameInProgress, GameResult};
use super::types::{DiceConfig, PlayerId};

/// Read-only view of the game for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Getters)]
pub struct GameSnapshot {
    /// Scores indexed by [`PlayerId::index`].
    scores: [u32; 2],
    /// Player to act (or who acted last, once finished).
    current_player: PlayerId,
    /// Score to land on exactly.
    target_score: u32,
    /// Completed turns.
    round_count: u32,
    /// Active or finished with an outcome.
    phase: Phase,
    /// Dice in play.
    dice: DiceConfig,
}

impl GameSnapshot {
    /// Score of one player.
    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores[player.index()]
    }
}

/// One game of lucky dice and everything needed to play it.
#[derive(Debug)]
pub struct GameEngine<R> {
    settings: GameSettings,
    dice: Dice,
    source: R,
    metrics: PerformanceMetrics,
    state: GameResult,
}

impl<R: RandomSource> GameEngine<R> {
    /// Starts a game at monotonic time `now`.
    #[instrument(skip(source))]
    pub fn new(settings: GameSettings, source: R, now: Duration) -> Self {
        let mut metrics = PerformanceMetrics::new();
        metrics.start_session(now);
        info!(
            target_score = settings.target_score(),
            faces = settings.dice().face_count(),
            dice = settings.dice().dice_count(),
            "New game"
        );
        Self {
            settings,
            dice: Dice::new(settings.dice()),
            source,
            metrics,
            state: GameResult::InProgress(GameInProgress::new(settings.target_score())),
        }
    }

    /// Applies the current player's action, decided at monotonic time `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::AlreadyFinished`] once the game is over; the
    /// engine is left untouched.
    #[instrument(skip(self), fields(round = self.state.round_count()))]
    pub fn apply_action(&mut self, action: Action, now: Duration) -> Result<TurnResult, ActionError> {
        let game = match &self.state {
            GameResult::InProgress(game) => game.clone(),
            GameResult::Finished(game) => {
                warn!(outcome = %game.outcome(), "Action rejected, game already finished");
                return Err(ActionError::AlreadyFinished(*game.outcome()));
            }
        };

        let player = game.current_player();
        let score_before = game.scores().current_score();
        let risky = self
            .settings
            .risk_threshold()
            .is_risky(score_before, self.settings.target_score());
        let decision_time = self.metrics.record_decision(now, action, risky);

        let (transition, roll) = match action {
            Action::Roll => {
                let roll = self.dice.roll(&mut self.source);
                let transition = game.roll(&roll);
                if !roll.is_instant_loss() {
                    self.metrics.record_successful_roll();
                }
                (transition, Some(roll))
            }
            Action::Pass => (game.pass(), None),
        };

        let score_after = transition.next.scores().score(player);
        let phase = transition.next.phase();
        let turn = TurnResult::new(
            player,
            action,
            roll,
            score_before,
            score_after,
            phase,
            transition.event,
            decision_time,
        );

        match phase {
            Phase::Active => debug!(%player, %action, score_after, "Turn complete"),
            Phase::Finished(outcome) => info!(%player, %action, score_after, %outcome, "Game over"),
        }

        self.state = transition.next;
        Ok(turn)
    }

    /// Discards the current game and starts another with the same settings.
    #[instrument(skip(self))]
    pub fn new_game(&mut self, now: Duration) {
        self.restart(self.settings, now);
    }

    /// Replaces the settings wholesale and starts a fresh game with them.
    #[instrument(skip(self))]
    pub fn change_settings(&mut self, settings: GameSettings, now: Duration) {
        self.restart(settings, now);
    }

    fn restart(&mut self, settings: GameSettings, now: Duration) {
        if matches!(self.state, GameResult::InProgress(_)) && self.state.round_count() > 0 {
            info!(round = self.state.round_count(), "Abandoning unfinished game");
        }
        self.settings = settings;
        self.dice = Dice::new(settings.dice());
        self.metrics = PerformanceMetrics::new();
        self.metrics.start_session(now);
        self.state = GameResult::InProgress(GameInProgress::new(settings.target_score()));
        info!(
            target_score = settings.target_score(),
            faces = settings.dice().face_count(),
            dice = settings.dice().dice_count(),
            "New game"
        );
    }
}

impl<R> GameEngine<R> {
    /// Settings of the current game.
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Current state in its typestate form.
    pub fn state(&self) -> &GameResult {
        &self.state
    }

    /// Outcome once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.phase().outcome()
    }

    /// Returns true once the game is over.
    pub fn is_finished(&self) -> bool {
        self.state.phase().is_finished()
    }

    /// Read-only view for presentation.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            scores: self.state.scores().scores(),
            current_player: self.state.scores().current_player(),
            target_score: self.state.target_score(),
            round_count: self.state.round_count(),
            phase: self.state.phase(),
            dice: self.dice.config(),
        }
    }

    /// Session statistics as of `now`.
    pub fn metrics(&self, now: Duration) -> MetricsSnapshot {
        self.metrics.snapshot(now)
    }
}
