//! Database models for finished games and their moves.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::Serialize;
use tracing::instrument;

use crate::db::{DbError, schema};
use crate::games::lucky_dice::{Outcome, PlayerId};

/// A finished game as stored in the history.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: i32,
    player1_score: i32,
    player2_score: i32,
    winner: i32,
    total_rounds: i32,
    duration_seconds: f64,
    target_score: i32,
    played_at: NaiveDateTime,
}

impl GameRecord {
    /// Parses the stored winner code.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the code is not 0, 1 or 2.
    #[instrument(skip(self), fields(id = self.id, winner = self.winner))]
    pub fn outcome(&self) -> Result<Outcome, DbError> {
        Outcome::from_winner_code(self.winner)
            .ok_or_else(|| DbError::new(format!("Invalid winner code: {}", self.winner)))
    }

    /// Final score of one player.
    pub fn score_of(&self, player: PlayerId) -> i32 {
        match player {
            PlayerId::One => self.player1_score,
            PlayerId::Two => self.player2_score,
        }
    }
}

/// Insertable game summary.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    player1_score: i32,
    player2_score: i32,
    winner: i32,
    total_rounds: i32,
    duration_seconds: f64,
    target_score: i32,
}

/// One action taken during a stored game.
#[derive(
    Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Selectable, Getters, Serialize,
)]
#[diesel(table_name = schema::moves)]
#[diesel(belongs_to(GameRecord, foreign_key = game_id))]
pub struct MoveRecord {
    id: i32,
    game_id: i32,
    player: i32,
    action: String,
    roll_value: Option<i32>,
    score_before: i32,
    score_after: i32,
    decision_seconds: f64,
    recorded_at: NaiveDateTime,
}

/// Insertable move.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::moves)]
pub struct NewMoveRecord {
    game_id: i32,
    player: i32,
    action: String,
    roll_value: Option<i32>,
    score_before: i32,
    score_after: i32,
    decision_seconds: f64,
}

impl NewMoveRecord {
    /// Reassigns the move to the game stored under `game_id`.
    pub fn with_game_id(self, game_id: i32) -> Self {
        Self { game_id, ..self }
    }
}

/// Aggregate results for one seat across every stored game.
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
pub struct PlayerStats {
    player: PlayerId,
    total_games: i32,
    wins: i32,
    losses: i32,
    ties: i32,
    avg_score: f64,
    avg_duration_seconds: f64,
    avg_decision_seconds: f64,
}

impl PlayerStats {
    /// Creates new player statistics.
    #[allow(clippy::too_many_arguments)]
    #[instrument]
    pub fn new(
        player: PlayerId,
        total_games: i32,
        wins: i32,
        losses: i32,
        ties: i32,
        avg_score: f64,
        avg_duration_seconds: f64,
        avg_decision_seconds: f64,
    ) -> Self {
        Self {
            player,
            total_games,
            wins,
            losses,
            ties,
            avg_score,
            avg_duration_seconds,
            avg_decision_seconds,
        }
    }

    /// Calculates win rate as a percentage (0.0–100.0).
    #[instrument(skip(self))]
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (self.wins as f64 / self.total_games as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rate_without_games() {
        let stats = PlayerStats::new(PlayerId::One, 0, 0, 0, 0, 0.0, 0.0, 0.0);
        assert_eq!(stats.win_rate(), 0.0);
    }

    #[test]
    fn test_win_rate() {
        let stats = PlayerStats::new(PlayerId::Two, 4, 3, 1, 0, 18.0, 40.0, 2.5);
        assert!((stats.win_rate() - 75.0).abs() < 1e-9);
    }
}
