//! Headless games between two bots that hold at a fixed score.
//!
//! Used to get a feel for a set of rules before playing them. Nothing here
//! touches the history database.

use std::time::Duration;

use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::games::lucky_dice::{
    Action, GameEngine, GameSettings, GameSnapshot, Outcome, PlayerId, RandomSource, RngSource,
};

/// Bot that rolls until its score reaches `hold_at`, then passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldAtPolicy {
    hold_at: u32,
}

impl HoldAtPolicy {
    /// Creates a policy holding at `hold_at`, raised to 1 so every player
    /// scores before passing.
    pub fn new(hold_at: u32) -> Self {
        Self {
            hold_at: hold_at.max(1),
        }
    }

    /// Score at which the bot stops rolling.
    pub fn hold_at(&self) -> u32 {
        self.hold_at
    }

    /// Chooses the action for the player to act.
    pub fn decide(&self, snapshot: &GameSnapshot) -> Action {
        if snapshot.score(*snapshot.current_player()) < self.hold_at {
            Action::Roll
        } else {
            Action::Pass
        }
    }
}

/// Final state of one simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct SimulatedGame {
    outcome: Outcome,
    scores: [u32; 2],
    actions: u32,
}

/// Plays one game to the end with both seats using `policy`.
#[instrument(skip(source))]
pub fn simulate_game<R: RandomSource>(
    settings: GameSettings,
    policy: HoldAtPolicy,
    source: R,
) -> SimulatedGame {
    let mut engine = GameEngine::new(settings, source, Duration::ZERO);
    let mut actions = 0;

    loop {
        if let Some(outcome) = engine.outcome() {
            let snapshot = engine.snapshot();
            debug!(%outcome, actions, "Simulated game finished");
            return SimulatedGame {
                outcome,
                scores: *snapshot.scores(),
                actions,
            };
        }

        let action = policy.decide(&engine.snapshot());
        actions += 1;
        if let Err(e) = engine.apply_action(action, Duration::ZERO) {
            warn!(error = %e, "Simulated action rejected");
        }
    }
}

/// Aggregate results of a batch of simulated games.
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
pub struct SimulationSummary {
    games: u32,
    seed: u64,
    hold_at: u32,
    player1_wins: u32,
    player2_wins: u32,
    ties: u32,
    mean_actions: f64,
}

impl SimulationSummary {
    /// Share of games won by Player 1 as a percentage.
    pub fn player1_win_rate(&self) -> f64 {
        percentage(self.player1_wins, self.games)
    }

    /// Share of games won by Player 2 as a percentage.
    pub fn player2_win_rate(&self) -> f64 {
        percentage(self.player2_wins, self.games)
    }
}

fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}

/// Plays `games` games; game `i` uses the generator seeded with `seed + i`.
#[instrument]
pub fn simulate_batch(
    settings: GameSettings,
    policy: HoldAtPolicy,
    games: u32,
    seed: u64,
) -> SimulationSummary {
    info!(games, seed, hold_at = policy.hold_at(), "Starting simulation");

    let mut player1_wins = 0;
    let mut player2_wins = 0;
    let mut ties = 0;
    let mut total_actions = 0u64;

    for i in 0..games {
        let source = RngSource::seeded(seed.wrapping_add(u64::from(i)));
        let game = simulate_game(settings, policy, source);
        total_actions += u64::from(game.actions);
        match game.outcome {
            Outcome::Winner(PlayerId::One) => player1_wins += 1,
            Outcome::Winner(PlayerId::Two) => player2_wins += 1,
            Outcome::Tie => ties += 1,
        }
    }

    let mean_actions = if games == 0 {
        0.0
    } else {
        total_actions as f64 / f64::from(games)
    };

    let summary = SimulationSummary {
        games,
        seed,
        hold_at: policy.hold_at(),
        player1_wins,
        player2_wins,
        ties,
        mean_actions,
    };
    info!(player1_wins, player2_wins, ties, "Simulation complete");
    summary
}
