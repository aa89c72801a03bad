//! End-to-end rule scenarios for the game engine.

use std::time::Duration;

use lucky_dice::{
    Action, ActionError, DiceConfig, GameEngine, GameSettings, MAX_DICE_COUNT, MAX_FACE_COUNT,
    MAX_TARGET_SCORE, Outcome, Phase, PlayerId, RandomSource, RiskThreshold, RngSource,
    ScriptedRolls, TurnEvent, TurnResult,
};

use Action::{Pass, Roll};

fn engine(rolls: &[u32]) -> GameEngine<ScriptedRolls> {
    GameEngine::new(
        GameSettings::default(),
        ScriptedRolls::new(rolls.iter().copied()),
        Duration::ZERO,
    )
}

/// Applies `actions` one second apart and returns every turn.
fn play<R: RandomSource>(
    engine: &mut GameEngine<R>,
    actions: &[Action],
) -> Vec<TurnResult> {
    actions
        .iter()
        .enumerate()
        .map(|(i, action)| {
            engine
                .apply_action(*action, Duration::from_secs(i as u64 + 1))
                .expect("Action rejected")
        })
        .collect()
}

#[test]
fn test_rolling_a_one_hands_victory_to_the_other_player() {
    let mut engine = engine(&[5, 6, 6, 1]);
    let turns = play(&mut engine, &[Roll, Pass, Roll, Pass, Roll]);
    assert_eq!(*turns[4].score_after(), 17);
    assert_eq!(*engine.snapshot().phase(), Phase::Active);

    let turns = play(&mut engine, &[Roll]);
    assert_eq!(*turns[0].player(), PlayerId::Two);
    assert_eq!(*turns[0].event(), TurnEvent::RolledOne);
    assert_eq!(engine.outcome(), Some(Outcome::Winner(PlayerId::One)));
    assert_eq!(engine.snapshot().score(PlayerId::Two), 0);
    assert_eq!(engine.snapshot().score(PlayerId::One), 17);
}

#[test]
fn test_overshooting_the_target_loses_and_keeps_the_score() {
    let mut engine = engine(&[6, 2, 6, 2, 6, 2, 4]);
    let turns = play(&mut engine, &[Roll; 7]);

    let last = turns.last().unwrap();
    assert_eq!(*last.player(), PlayerId::One);
    assert_eq!(*last.score_before(), 18);
    assert_eq!(*last.score_after(), 22);
    assert_eq!(*last.event(), TurnEvent::BustedOverTarget);
    assert_eq!(engine.outcome(), Some(Outcome::Winner(PlayerId::Two)));
    assert_eq!(engine.snapshot().score(PlayerId::One), 22);
}

#[test]
fn test_landing_on_the_target_wins() {
    let mut engine = engine(&[5, 2, 5, 2, 5, 2, 6]);
    let turns = play(&mut engine, &[Roll; 7]);

    let last = turns.last().unwrap();
    assert_eq!(*last.score_before(), 15);
    assert_eq!(*last.score_after(), 21);
    assert_eq!(*last.event(), TurnEvent::ExactWin);
    assert_eq!(engine.outcome(), Some(Outcome::Winner(PlayerId::One)));
}

#[test]
fn test_two_passes_in_a_row_go_to_the_higher_score() {
    let mut engine = engine(&[4, 6, 6, 4, 4]);
    play(&mut engine, &[Roll, Roll, Roll, Roll, Pass, Roll]);
    assert_eq!(*engine.snapshot().scores(), [10, 14]);

    let turns = play(&mut engine, &[Pass, Pass]);
    assert_eq!(*turns[0].event(), TurnEvent::Passed);
    assert_eq!(*turns[1].event(), TurnEvent::HigherScoreWinsAtPass);
    assert_eq!(engine.outcome(), Some(Outcome::Winner(PlayerId::Two)));
    assert_eq!(
        turns[1].message(),
        "Both players passed. Player 2 wins with the higher score!"
    );
}

#[test]
fn test_two_passes_with_equal_scores_tie() {
    let mut engine = engine(&[5]);
    let turns = play(&mut engine, &[Roll, Roll, Pass, Pass]);
    assert_eq!(*turns[3].event(), TurnEvent::TieAtPass);
    assert_eq!(engine.outcome(), Some(Outcome::Tie));
}

#[test]
fn test_passes_before_anyone_scores_do_not_end_the_game() {
    let mut engine = engine(&[3]);
    play(&mut engine, &[Pass, Pass, Pass]);
    let snapshot = engine.snapshot();
    assert_eq!(*snapshot.phase(), Phase::Active);
    assert_eq!(*snapshot.round_count(), 3);
    assert_eq!(*snapshot.current_player(), PlayerId::Two);
}

#[test]
fn test_players_alternate_once_per_turn() {
    let mut engine = engine(&[2, 3]);
    let turns = play(&mut engine, &[Roll, Pass, Roll, Roll, Pass]);
    let players: Vec<PlayerId> = turns.iter().map(|t| *t.player()).collect();
    assert_eq!(
        players,
        [
            PlayerId::One,
            PlayerId::Two,
            PlayerId::One,
            PlayerId::Two,
            PlayerId::One
        ]
    );
    assert_eq!(*engine.snapshot().round_count(), 5);
}

#[test]
fn test_actions_after_the_end_are_rejected() {
    let mut engine = engine(&[1]);
    play(&mut engine, &[Roll]);
    let before = engine.snapshot();

    for action in [Roll, Pass] {
        let err = engine
            .apply_action(action, Duration::from_secs(9))
            .unwrap_err();
        assert_eq!(err, ActionError::AlreadyFinished(Outcome::Winner(PlayerId::Two)));
    }
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn test_ones_do_not_lose_with_several_dice() {
    let settings = GameSettings::normalize(21, 6, 2, RiskThreshold::default()).into_value();
    let mut engine = GameEngine::new(settings, ScriptedRolls::new([1]), Duration::ZERO);
    let turns = play(&mut engine, &[Roll]);

    assert_eq!(turns[0].roll().as_ref().map(|r| r.values().to_vec()), Some(vec![1, 1]));
    assert_eq!(*turns[0].event(), TurnEvent::Rolled);
    assert_eq!(engine.snapshot().score(PlayerId::One), 2);
}

#[test]
fn test_metrics_track_a_short_game() {
    let mut engine = engine(&[6, 6, 6, 6, 1]);
    play(&mut engine, &[Roll, Roll, Roll, Roll, Pass, Roll]);

    let metrics = engine.metrics(Duration::from_secs(10));
    assert_eq!(*metrics.total_decisions(), 6);
    assert_eq!(*metrics.total_rolls(), 5);
    assert_eq!(*metrics.session_duration(), Duration::from_secs(10));
    assert_eq!(*metrics.average_decision_time(), Duration::from_secs(1));
    assert!((metrics.success_rate() - 80.0).abs() < 1e-9);
    assert_eq!(*metrics.risk_ratio(), 0.0);
}

#[test]
fn test_percent_threshold_marks_small_targets_risky() {
    let settings =
        GameSettings::normalize(10, 6, 1, RiskThreshold::PercentOfTarget(50)).into_value();
    let mut engine = GameEngine::new(settings, ScriptedRolls::new([6, 2, 2]), Duration::ZERO);
    play(&mut engine, &[Roll, Roll, Roll]);
    // Only Player 1's second roll, from 6 of 10, is above half the target.
    let metrics = engine.metrics(Duration::from_secs(3));
    assert!((metrics.risk_ratio() - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_seeded_games_are_reproducible() {
    let run = |seed| {
        let mut engine = GameEngine::new(
            GameSettings::default(),
            RngSource::seeded(seed),
            Duration::ZERO,
        );
        let mut rolls = Vec::new();
        while engine.outcome().is_none() && rolls.len() < 50 {
            let turn = engine
                .apply_action(Roll, Duration::ZERO)
                .expect("Game still active");
            rolls.push(turn.roll().as_ref().map(|r| r.total()));
        }
        rolls
    };
    assert_eq!(run(11), run(11));
}

#[test]
fn test_invalid_settings_fall_back_to_defaults() {
    let normalized = GameSettings::normalize(-3, 1, 0, RiskThreshold::default());
    assert!(normalized.was_corrected());
    assert_eq!(normalized.issues().len(), 3);
    assert_eq!(normalized.value().dice(), DiceConfig::default());
    assert_eq!(normalized.value().target_score(), 21);
}

#[test]
fn test_oversized_settings_cannot_overflow_scores() {
    let settings = GameSettings::normalize(
        i64::from(u32::MAX),
        i64::from(u32::MAX),
        2,
        RiskThreshold::default(),
    );
    assert!(settings.was_corrected());
    let mut engine = GameEngine::new(
        settings.into_value(),
        ScriptedRolls::new([u32::MAX]),
        Duration::ZERO,
    );

    let turn = engine
        .apply_action(Roll, Duration::ZERO)
        .expect("Game still active");
    assert_eq!(turn.roll().as_ref().map(|r| r.values().to_vec()), Some(vec![6, 6]));
    assert_eq!(*turn.event(), TurnEvent::Rolled);
    assert_eq!(*turn.score_after(), 12);
}

#[test]
fn test_largest_settings_still_bust_over_target() {
    let settings = GameSettings::normalize(
        i64::from(MAX_TARGET_SCORE) - 1,
        i64::from(MAX_FACE_COUNT),
        i64::from(MAX_DICE_COUNT),
        RiskThreshold::default(),
    );
    assert!(!settings.was_corrected());
    let mut engine = GameEngine::new(
        settings.into_value(),
        ScriptedRolls::new([MAX_FACE_COUNT]),
        Duration::ZERO,
    );

    let mut last = None;
    while engine.outcome().is_none() {
        let turn = engine
            .apply_action(Roll, Duration::ZERO)
            .expect("Game still active");
        let roll = turn.roll().as_ref().expect("Roll has dice");
        assert_eq!(roll.total(), roll.values().iter().sum::<u32>());
        last = Some(turn);
    }

    // Player 1's tenth maximal roll reaches exactly one past the target.
    let last = last.expect("At least one turn");
    assert_eq!(*last.player(), PlayerId::One);
    assert_eq!(*last.event(), TurnEvent::BustedOverTarget);
    assert_eq!(*last.score_after(), 10 * MAX_FACE_COUNT * MAX_DICE_COUNT);
    assert_eq!(engine.outcome(), Some(Outcome::Winner(PlayerId::Two)));
}
