//! Game session: one engine, its clock and the history it reports to.
//!
//! The engine knows nothing about storage. The session buffers every move of
//! the running game and writes the game and its moves to the
//! [`HistoryStore`] in one step once the game is over. Storage failures are reported in
//! the [`TurnUpdate`] and never touch the game state.

use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, HistoryStore, NewGameRecord, NewMoveRecord};
use crate::games::lucky_dice::{
    Action, ActionError, Clock, GameEngine, GameSettings, GameSnapshot, MetricsSnapshot,
    RandomSource, TurnResult,
};

/// What happened to a turn on its way to the history.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceStatus {
    /// Held in memory until the game ends.
    Buffered,
    /// The game finished and was stored under this id.
    Saved(i32),
    /// The game finished but could not be stored.
    Failed(DbError),
}

/// Result of one action as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct TurnUpdate {
    /// What the action did to the game.
    turn: TurnResult,
    /// Where the action stands with the history store.
    persistence: PersistenceStatus,
}

/// A running game wired to a clock and a history store.
#[derive(Debug)]
pub struct DiceSession<R, S, C> {
    engine: GameEngine<R>,
    store: S,
    clock: C,
    pending: Vec<TurnResult>,
}

impl<R, S, C> DiceSession<R, S, C>
where
    R: RandomSource,
    S: HistoryStore,
    C: Clock,
{
    /// Starts a session with a fresh game.
    #[instrument(skip(source, store, clock))]
    pub fn new(settings: GameSettings, source: R, store: S, clock: C) -> Self {
        let engine = GameEngine::new(settings, source, clock.now());
        Self {
            engine,
            store,
            clock,
            pending: Vec::new(),
        }
    }

    /// Applies the current player's action.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] if the game is already over.
    #[instrument(skip(self))]
    pub fn act(&mut self, action: Action) -> Result<TurnUpdate, ActionError> {
        let now = self.clock.now();
        let turn = self.engine.apply_action(action, now)?;
        self.pending.push(turn.clone());

        let persistence = if turn.is_terminal() {
            self.persist_finished_game()
        } else {
            PersistenceStatus::Buffered
        };

        Ok(TurnUpdate { turn, persistence })
    }

    /// Drops the current game, unfinished or not, and starts another.
    #[instrument(skip(self))]
    pub fn new_game(&mut self) {
        self.discard_pending();
        self.engine.new_game(self.clock.now());
    }

    /// Starts a fresh game with new settings.
    #[instrument(skip(self))]
    pub fn change_settings(&mut self, settings: GameSettings) {
        self.discard_pending();
        self.engine.change_settings(settings, self.clock.now());
    }

    /// Metrics of the current game as of now.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.engine.metrics(self.clock.now())
    }

    fn discard_pending(&mut self) {
        if !self.pending.is_empty() {
            info!(moves = self.pending.len(), "Abandoned game not recorded");
            self.pending.clear();
        }
    }

    fn persist_finished_game(&mut self) -> PersistenceStatus {
        let moves = std::mem::take(&mut self.pending);
        match self.write_history(&moves) {
            Ok(game_id) => {
                info!(game_id, moves = moves.len(), "Game saved to history");
                PersistenceStatus::Saved(game_id)
            }
            Err(e) => {
                warn!(error = %e, "Failed to save game to history");
                PersistenceStatus::Failed(e)
            }
        }
    }

    fn write_history(&self, moves: &[TurnResult]) -> Result<i32, DbError> {
        let snapshot = self.engine.snapshot();
        let outcome = snapshot
            .phase()
            .outcome()
            .ok_or_else(|| DbError::new("Game is not finished"))?;
        let metrics = self.metrics();

        let game = NewGameRecord::new(
            db_int(snapshot.scores()[0]),
            db_int(snapshot.scores()[1]),
            outcome.winner_code(),
            db_int(snapshot.round_count().saturating_add(1)),
            metrics.session_duration().as_secs_f64(),
            db_int(*snapshot.target_score()),
        );
        // Ids are assigned by the store once the game row exists.
        let records = moves.iter().map(|turn| move_record(0, turn)).collect();
        let game_id = self.store.record_finished_game(game, records)?;
        debug!(game_id, count = moves.len(), "Moves recorded");
        Ok(game_id)
    }
}

impl<R, S, C> DiceSession<R, S, C> {
    /// Read-only view of the game.
    pub fn snapshot(&self) -> GameSnapshot {
        self.engine.snapshot()
    }

    /// The engine driving this session.
    pub fn engine(&self) -> &GameEngine<R> {
        &self.engine
    }

    /// History store the session writes to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Moves of the running game not yet written to the history.
    pub fn pending_moves(&self) -> &[TurnResult] {
        &self.pending
    }
}

fn move_record(game_id: i32, turn: &TurnResult) -> NewMoveRecord {
    NewMoveRecord::new(
        game_id,
        turn.player().number(),
        turn.action().as_ref().to_string(),
        turn.roll().as_ref().map(|roll| db_int(roll.total())),
        db_int(*turn.score_before()),
        db_int(*turn.score_after()),
        turn.decision_time().as_secs_f64(),
    )
}

fn db_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
