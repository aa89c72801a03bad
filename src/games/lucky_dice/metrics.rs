//! Decision timing and risk-taking statistics for one game.
//!
//! Timestamps are monotonic readings expressed as a [`Duration`] since an
//! arbitrary origin. Callers supply them, so the metrics never read a clock
//! themselves and stay deterministic under test.

use std::cell::Cell;
use std::time::{Duration, Instant};

use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, instrument};

use super::action::Action;

/// Monotonic time source.
pub trait Clock {
    /// Current reading, as time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall-clock backed [`Clock`] whose origin is its construction time.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts a clock at zero.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven [`Clock`] for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Starts a clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Sets the current reading.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Raw counters accumulated over one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerformanceMetrics {
    decision_intervals: Vec<Duration>,
    roll_count: u32,
    successful_rolls: u32,
    risky_actions: u32,
    safe_actions: u32,
    session_start: Option<Duration>,
    last_action: Option<Duration>,
}

impl PerformanceMetrics {
    /// Creates metrics with no session started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every counter and starts timing from `now`.
    #[instrument(skip(self))]
    pub fn start_session(&mut self, now: Duration) {
        *self = Self {
            session_start: Some(now),
            last_action: Some(now),
            ..Self::default()
        };
        debug!("Metrics session started");
    }

    /// Records a decision taken at `now` and returns the time spent on it.
    ///
    /// Must be called before the action's effect is applied; `risky` is judged
    /// from the score the player held when deciding. Only rolls count towards
    /// the risky and safe tallies.
    #[instrument(skip(self))]
    pub fn record_decision(&mut self, now: Duration, kind: Action, risky: bool) -> Duration {
        let interval = self
            .last_action
            .map(|last| now.saturating_sub(last))
            .unwrap_or_default();
        self.decision_intervals.push(interval);
        self.last_action = Some(now);

        if kind == Action::Roll {
            self.roll_count += 1;
            if risky {
                self.risky_actions += 1;
            } else {
                self.safe_actions += 1;
            }
        }

        debug!(interval_ms = interval.as_millis() as u64, "Decision recorded");
        interval
    }

    /// Counts a roll that did not end the game with a 1.
    pub fn record_successful_roll(&mut self) {
        self.successful_rolls += 1;
    }

    /// Number of decisions recorded so far.
    pub fn decision_count(&self) -> usize {
        self.decision_intervals.len()
    }

    /// Derives session statistics as of `now` without changing any counter.
    #[instrument(skip(self))]
    pub fn snapshot(&self, now: Duration) -> MetricsSnapshot {
        let session_duration = self
            .session_start
            .map(|start| now.saturating_sub(start))
            .unwrap_or_default();

        let average_decision_time = match u32::try_from(self.decision_intervals.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(count) => self.decision_intervals.iter().sum::<Duration>() / count,
        };

        let success_rate = percentage(self.successful_rolls, self.roll_count);
        let risk_ratio = percentage(self.risky_actions, self.risky_actions + self.safe_actions);

        MetricsSnapshot {
            session_duration,
            average_decision_time,
            success_rate,
            risk_ratio,
            total_rolls: self.roll_count,
            total_decisions: self.decision_intervals.len(),
        }
    }
}

fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}

/// Derived session statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Getters)]
pub struct MetricsSnapshot {
    /// Time since the session started.
    session_duration: Duration,
    /// Mean time between decisions.
    average_decision_time: Duration,
    /// Percentage (0.0–100.0) of rolls that did not end in a 1.
    success_rate: f64,
    /// Percentage (0.0–100.0) of rolls taken from a risky score.
    risk_ratio: f64,
    /// Rolls recorded.
    total_rolls: u32,
    /// Decisions recorded, rolls and passes alike.
    total_decisions: usize,
}
