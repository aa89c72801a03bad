//! Dice and the random sources that drive them.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use super::types::{DiceConfig, RollOutcome};

/// Uniform integer generator over a closed range.
pub trait RandomSource {
    /// Draws a value uniformly from `[min, max]`.
    fn next_in_range(&mut self, min: u32, max: u32) -> u32;
}

/// [`RandomSource`] backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl RngSource<StdRng> {
    /// Seeds a standard generator from operating-system entropy.
    #[instrument]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeds a standard generator deterministically.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RngSource<R> {
    /// Wraps an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_in_range(&mut self, min: u32, max: u32) -> u32 {
        self.rng.gen_range(min..=max)
    }
}

/// Replays a fixed sequence of values, cycling when it runs out.
///
/// Values outside the requested range are clamped into it, and an empty
/// script always yields `min`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    values: VecDeque<u32>,
}

impl ScriptedRolls {
    /// Creates a script that yields `values` in order.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Values not yet consumed in the current cycle.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRolls {
    fn next_in_range(&mut self, min: u32, max: u32) -> u32 {
        match self.values.pop_front() {
            Some(value) => {
                self.values.push_back(value);
                value.clamp(min, max)
            }
            None => min,
        }
    }
}

/// A set of identical dice thrown together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dice {
    config: DiceConfig,
}

impl Dice {
    /// Creates dice with the given configuration.
    pub fn new(config: DiceConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> DiceConfig {
        self.config
    }

    /// Throws every die once, drawing each face from `source`.
    #[instrument(skip(self, source), fields(faces = self.config.face_count(), dice = self.config.dice_count()))]
    pub fn roll<S: RandomSource + ?Sized>(&self, source: &mut S) -> RollOutcome {
        let values = (0..self.config.dice_count())
            .map(|_| source.next_in_range(1, self.config.face_count()))
            .collect();
        let outcome = RollOutcome::new(values);
        debug!(values = ?outcome.values(), total = outcome.total(), "Dice rolled");
        outcome
    }
}
