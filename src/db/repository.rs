//! SQLite-backed game history.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{
    DbError, GameRecord, HistoryStore, MoveRecord, NewGameRecord, NewMoveRecord, PlayerStats,
    schema,
};
use crate::games::lucky_dice::PlayerId;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Game history stored in a SQLite file.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    db_path: String,
}

impl HistoryRepository {
    /// Opens the database at `db_path`, creating it and applying any pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening history database");
        let repo = Self { db_path };
        let mut conn = repo.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        if !applied.is_empty() {
            info!(count = applied.len(), "Applied migrations");
        }
        Ok(repo)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Moves of one game in the order they were played.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn moves_for_game(&self, game_id: i32) -> Result<Vec<MoveRecord>, DbError> {
        debug!(game_id, "Loading moves");
        let mut conn = self.connection()?;

        let moves = schema::moves::table
            .filter(schema::moves::game_id.eq(game_id))
            .order(schema::moves::id.asc())
            .select(MoveRecord::as_select())
            .load(&mut conn)?;

        debug!(game_id, count = moves.len(), "Moves loaded");
        Ok(moves)
    }
}

impl HistoryStore for HistoryRepository {
    #[instrument(skip(self, record), fields(game_id = record.game_id(), player = record.player(), action = %record.action()))]
    fn record_move(&self, record: NewMoveRecord) -> Result<(), DbError> {
        let mut conn = self.connection()?;

        let stored = diesel::insert_into(schema::moves::table)
            .values(&record)
            .returning(MoveRecord::as_returning())
            .get_result(&mut conn)?;

        debug!(move_id = stored.id(), "Move recorded");
        Ok(())
    }

    #[instrument(skip(self, record), fields(winner = record.winner(), rounds = record.total_rounds()))]
    fn record_game(&self, record: NewGameRecord) -> Result<i32, DbError> {
        debug!("Recording game result");
        let mut conn = self.connection()?;

        let game = diesel::insert_into(schema::games::table)
            .values(&record)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(
            game_id = game.id(),
            player1_score = game.player1_score(),
            player2_score = game.player2_score(),
            winner = game.winner(),
            "Game recorded"
        );
        Ok(*game.id())
    }

    #[instrument(skip(self, game, moves), fields(winner = game.winner(), moves = moves.len()))]
    fn record_finished_game(
        &self,
        game: NewGameRecord,
        moves: Vec<NewMoveRecord>,
    ) -> Result<i32, DbError> {
        let mut conn = self.connection()?;

        let game_id = conn.transaction::<i32, DbError, _>(|conn| {
            let stored = diesel::insert_into(schema::games::table)
                .values(&game)
                .returning(GameRecord::as_returning())
                .get_result(conn)?;
            let game_id = *stored.id();

            for record in moves {
                diesel::insert_into(schema::moves::table)
                    .values(&record.with_game_id(game_id))
                    .execute(conn)?;
            }
            Ok(game_id)
        })?;

        info!(game_id, "Finished game recorded");
        Ok(game_id)
    }

    #[instrument(skip(self))]
    fn recent_games(&self, limit: i64) -> Result<Vec<GameRecord>, DbError> {
        let mut conn = self.connection()?;

        let games = schema::games::table
            .order(schema::games::id.desc())
            .limit(limit.max(0))
            .select(GameRecord::as_select())
            .load(&mut conn)?;

        info!(count = games.len(), "Recent games loaded");
        Ok(games)
    }

    #[instrument(skip(self))]
    fn player_stats(&self, player: PlayerId) -> Result<PlayerStats, DbError> {
        debug!(%player, "Computing player stats");
        let mut conn = self.connection()?;

        let games = schema::games::table
            .select(GameRecord::as_select())
            .load(&mut conn)?;

        let mut wins = 0;
        let mut losses = 0;
        let mut ties = 0;
        let mut score_sum = 0.0;
        let mut duration_sum = 0.0;

        for game in &games {
            match *game.winner() {
                0 => ties += 1,
                w if w == player.number() => wins += 1,
                w if w == player.opponent().number() => losses += 1,
                other => warn!(winner = other, game_id = game.id(), "Unknown winner code"),
            }
            score_sum += f64::from(game.score_of(player));
            duration_sum += game.duration_seconds();
        }

        let decisions: Vec<f64> = schema::moves::table
            .filter(schema::moves::player.eq(player.number()))
            .select(schema::moves::decision_seconds)
            .load(&mut conn)?;

        let total = games.len() as i32;
        let stats = PlayerStats::new(
            player,
            total,
            wins,
            losses,
            ties,
            mean(score_sum, games.len()),
            mean(duration_sum, games.len()),
            mean(decisions.iter().sum(), decisions.len()),
        );

        info!(
            %player,
            total,
            wins,
            losses,
            ties,
            win_rate = %format!("{:.1}%", stats.win_rate()),
            "Player stats computed"
        );

        Ok(stats)
    }
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}
