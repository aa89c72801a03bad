//! Storage seam between a game session and its history.

use crate::db::{DbError, GameRecord, NewGameRecord, NewMoveRecord, PlayerStats};
use crate::games::lucky_dice::PlayerId;

/// Append-only log of finished games and their moves.
pub trait HistoryStore {
    /// Appends one move of a recorded game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the move cannot be stored.
    fn record_move(&self, record: NewMoveRecord) -> Result<(), DbError>;

    /// Appends a finished game and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the game cannot be stored.
    fn record_game(&self, record: NewGameRecord) -> Result<i32, DbError>;

    /// Stores a finished game together with all of its moves and returns the
    /// game id.
    ///
    /// Either everything is stored or nothing is. The `game_id` of each move
    /// is replaced with the id of the new game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the game or any move cannot be stored.
    fn record_finished_game(
        &self,
        game: NewGameRecord,
        moves: Vec<NewMoveRecord>,
    ) -> Result<i32, DbError>;

    /// Most recent games first, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the history cannot be read.
    fn recent_games(&self, limit: i64) -> Result<Vec<GameRecord>, DbError>;

    /// Aggregate results for one seat.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the history cannot be read.
    fn player_stats(&self, player: PlayerId) -> Result<PlayerStats, DbError>;
}

impl<T: HistoryStore + ?Sized> HistoryStore for &T {
    fn record_move(&self, record: NewMoveRecord) -> Result<(), DbError> {
        (**self).record_move(record)
    }

    fn record_game(&self, record: NewGameRecord) -> Result<i32, DbError> {
        (**self).record_game(record)
    }

    fn record_finished_game(
        &self,
        game: NewGameRecord,
        moves: Vec<NewMoveRecord>,
    ) -> Result<i32, DbError> {
        (**self).record_finished_game(game, moves)
    }

    fn recent_games(&self, limit: i64) -> Result<Vec<GameRecord>, DbError> {
        (**self).recent_games(limit)
    }

    fn player_stats(&self, player: PlayerId) -> Result<PlayerStats, DbError> {
        (**self).player_stats(player)
    }
}
