//! Tests for the game history repository.

use diesel::Connection;
use diesel::SqliteConnection;
use diesel_migrations::MigrationHarness;
use tempfile::NamedTempFile;

use lucky_dice::{
    HistoryRepository, HistoryStore, MIGRATIONS, NewGameRecord, NewMoveRecord, Outcome, PlayerId,
};

/// Creates a temporary database file and opens a repository on it. The file
/// handle must stay in scope to keep the file alive.
fn setup_test_db() -> (NamedTempFile, HistoryRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = HistoryRepository::open(db_path).expect("Failed to open repository");
    (db_file, repo)
}

fn game(p1: i32, p2: i32, winner: i32) -> NewGameRecord {
    NewGameRecord::new(p1, p2, winner, 6, 30.0, 21)
}

#[test]
fn test_open_applies_migrations() {
    let (db, _repo) = setup_test_db();
    let mut conn =
        SqliteConnection::establish(db.path().to_str().unwrap()).expect("Failed to connect");
    assert!(
        !conn
            .has_pending_migration(MIGRATIONS)
            .expect("Migration check failed")
    );
}

#[test]
fn test_open_twice_is_harmless() {
    let (db, repo) = setup_test_db();
    repo.record_game(game(21, 8, 1)).expect("Record failed");

    let reopened = HistoryRepository::open(db.path().to_str().unwrap().to_string())
        .expect("Reopen failed");
    assert_eq!(reopened.recent_games(10).expect("Query failed").len(), 1);
}

#[test]
fn test_record_game_returns_stored_id() {
    let (_db, repo) = setup_test_db();
    let first = repo.record_game(game(21, 8, 1)).expect("Record failed");
    let second = repo.record_game(game(4, 0, 1)).expect("Record failed");
    assert!(first > 0);
    assert!(second > first);

    let games = repo.recent_games(1).expect("Query failed");
    let stored = &games[0];
    assert_eq!(*stored.id(), second);
    assert_eq!(*stored.player1_score(), 4);
    assert_eq!(*stored.total_rounds(), 6);
    assert_eq!(*stored.target_score(), 21);
    assert_eq!(stored.outcome().expect("Bad winner"), Outcome::Winner(PlayerId::One));
}

#[test]
fn test_recent_games_newest_first_with_limit() {
    let (_db, repo) = setup_test_db();
    let ids: Vec<i32> = (0..5)
        .map(|i| repo.record_game(game(i, 0, 1)).expect("Record failed"))
        .collect();

    let games = repo.recent_games(3).expect("Query failed");
    let got: Vec<i32> = games.iter().map(|g| *g.id()).collect();
    assert_eq!(got, [ids[4], ids[3], ids[2]]);
}

#[test]
fn test_recent_games_empty_and_negative_limit() {
    let (_db, repo) = setup_test_db();
    assert!(repo.recent_games(20).expect("Query failed").is_empty());
    repo.record_game(game(1, 1, 0)).expect("Record failed");
    assert!(repo.recent_games(-1).expect("Query failed").is_empty());
}

#[test]
fn test_record_game_rejects_unknown_winner() {
    let (_db, repo) = setup_test_db();
    let result = repo.record_game(game(3, 3, 7));
    assert!(result.is_err(), "Winner code outside 0..=2 should fail");
}

#[test]
fn test_moves_are_stored_in_play_order() {
    let (_db, repo) = setup_test_db();
    let game_id = repo.record_game(game(0, 6, 2)).expect("Record failed");
    let moves = [
        NewMoveRecord::new(game_id, 1, "pass".to_string(), None, 0, 0, 1.5),
        NewMoveRecord::new(game_id, 2, "roll".to_string(), Some(6), 0, 6, 2.0),
        NewMoveRecord::new(game_id, 1, "roll".to_string(), Some(1), 0, 0, 0.5),
    ];
    for record in moves {
        repo.record_move(record).expect("Record move failed");
    }

    let stored = repo.moves_for_game(game_id).expect("Query failed");
    let actions: Vec<&str> = stored.iter().map(|m| m.action().as_str()).collect();
    assert_eq!(actions, ["pass", "roll", "roll"]);
    assert_eq!(*stored[0].roll_value(), None);
    assert_eq!(*stored[1].roll_value(), Some(6));
    assert_eq!(*stored[1].score_after(), 6);
    assert!(repo.moves_for_game(game_id + 1).expect("Query failed").is_empty());
}

#[test]
fn test_player_stats_counts_results() {
    let (_db, repo) = setup_test_db();
    repo.record_game(NewGameRecord::new(21, 10, 1, 8, 40.0, 21))
        .expect("Record failed");
    repo.record_game(NewGameRecord::new(12, 14, 2, 9, 20.0, 21))
        .expect("Record failed");
    repo.record_game(NewGameRecord::new(9, 9, 0, 4, 30.0, 21))
        .expect("Record failed");

    let one = repo.player_stats(PlayerId::One).expect("Stats failed");
    assert_eq!(*one.player(), PlayerId::One);
    assert_eq!(*one.total_games(), 3);
    assert_eq!(*one.wins(), 1);
    assert_eq!(*one.losses(), 1);
    assert_eq!(*one.ties(), 1);
    assert!((one.avg_score() - 14.0).abs() < 1e-9);
    assert!((one.avg_duration_seconds() - 30.0).abs() < 1e-9);

    let two = repo.player_stats(PlayerId::Two).expect("Stats failed");
    assert_eq!(*two.wins(), 1);
    assert_eq!(*two.losses(), 1);
    assert!((two.avg_score() - 11.0).abs() < 1e-9);
}

#[test]
fn test_player_stats_averages_own_decisions() {
    let (_db, repo) = setup_test_db();
    let game_id = repo.record_game(game(5, 0, 2)).expect("Record failed");
    for (player, seconds) in [(1, 1.0), (2, 4.0), (1, 3.0)] {
        repo.record_move(NewMoveRecord::new(
            game_id,
            player,
            "pass".to_string(),
            None,
            0,
            0,
            seconds,
        ))
        .expect("Record move failed");
    }

    let one = repo.player_stats(PlayerId::One).expect("Stats failed");
    assert!((one.avg_decision_seconds() - 2.0).abs() < 1e-9);
    let two = repo.player_stats(PlayerId::Two).expect("Stats failed");
    assert!((two.avg_decision_seconds() - 4.0).abs() < 1e-9);
}

#[test]
fn test_player_stats_empty_history() {
    let (_db, repo) = setup_test_db();
    let stats = repo.player_stats(PlayerId::Two).expect("Stats failed");
    assert_eq!(*stats.total_games(), 0);
    assert_eq!(stats.win_rate(), 0.0);
    assert_eq!(*stats.avg_score(), 0.0);
    assert_eq!(*stats.avg_decision_seconds(), 0.0);
}

fn draft_move(player: i32, roll: Option<i32>, before: i32, after: i32) -> NewMoveRecord {
    let action = if roll.is_some() { "roll" } else { "pass" };
    NewMoveRecord::new(0, player, action.to_string(), roll, before, after, 1.0)
}

#[test]
fn test_finished_game_is_stored_with_its_moves() {
    let (_db, repo) = setup_test_db();
    let moves = vec![
        draft_move(1, Some(6), 0, 6),
        draft_move(2, Some(2), 0, 2),
        draft_move(1, Some(1), 6, 6),
    ];

    let game_id = repo
        .record_finished_game(game(6, 2, 2), moves)
        .expect("Record failed");

    let stored = repo.moves_for_game(game_id).expect("Query failed");
    assert_eq!(stored.len(), 3);
    assert!(stored.iter().all(|m| *m.game_id() == game_id));
    assert_eq!(*stored[2].roll_value(), Some(1));
}

#[test]
fn test_failed_move_leaves_no_partial_game() {
    let (_db, repo) = setup_test_db();
    // The second move names a seat the schema rejects.
    let moves = vec![
        draft_move(1, Some(6), 0, 6),
        draft_move(3, Some(2), 0, 2),
        draft_move(1, Some(1), 6, 6),
    ];

    let result = repo.record_finished_game(game(6, 2, 2), moves);
    assert!(result.is_err(), "Invalid move should fail the whole game");

    assert!(repo.recent_games(10).expect("Query failed").is_empty());
    let stats = repo.player_stats(PlayerId::One).expect("Stats failed");
    assert_eq!(*stats.total_games(), 0);
    assert_eq!(*stats.avg_decision_seconds(), 0.0);

    // The next game still gets stored normally.
    let game_id = repo
        .record_finished_game(game(6, 2, 2), vec![draft_move(1, Some(6), 0, 6)])
        .expect("Record failed");
    assert_eq!(repo.moves_for_game(game_id).expect("Query failed").len(), 1);
}
