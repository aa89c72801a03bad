//! Game settings: target score, dice shape and risk policy.

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::types::{ConfigIssue, DEFAULT_TARGET_SCORE, DiceConfig, MAX_TARGET_SCORE, Normalized};

/// Score above which a roll counts as risky with the default policy.
pub const DEFAULT_RISK_THRESHOLD: u32 = 15;

/// Rule for classifying a roll as risky, judged on the score before rolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskThreshold {
    /// Risky when the score is strictly above this value, whatever the target.
    Absolute(u32),
    /// Risky when the score is strictly above this percentage of the target.
    PercentOfTarget(u32),
}

impl RiskThreshold {
    /// Returns true if rolling from `score` counts as risky.
    pub fn is_risky(self, score: u32, target_score: u32) -> bool {
        match self {
            Self::Absolute(limit) => score > limit,
            Self::PercentOfTarget(percent) => {
                u64::from(score) * 100 > u64::from(target_score) * u64::from(percent)
            }
        }
    }
}

impl Default for RiskThreshold {
    fn default() -> Self {
        Self::Absolute(DEFAULT_RISK_THRESHOLD)
    }
}

/// Everything that shapes one game. Replaced as a whole, never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameSettings {
    target_score: u32,
    dice: DiceConfig,
    risk_threshold: RiskThreshold,
}

impl GameSettings {
    /// Builds settings from raw user input, coercing out-of-range values.
    ///
    /// Each correction is logged and returned alongside the settings.
    #[instrument]
    pub fn normalize(
        target_score: i64,
        face_count: i64,
        dice_count: i64,
        risk_threshold: RiskThreshold,
    ) -> Normalized<Self> {
        let dice = DiceConfig::new(face_count, dice_count);
        let mut issues = dice.issues().to_vec();

        let target_score = match u32::try_from(target_score) {
            Ok(target) if (1..=MAX_TARGET_SCORE).contains(&target) => target,
            _ => {
                issues.push(ConfigIssue::TargetScore(target_score));
                DEFAULT_TARGET_SCORE
            }
        };

        for issue in &issues {
            warn!(%issue, "Invalid setting replaced by default");
        }

        Normalized::new(
            Self {
                target_score,
                dice: dice.into_value(),
                risk_threshold,
            },
            issues,
        )
    }

    /// Score to land on exactly.
    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    /// Dice thrown per roll.
    pub fn dice(&self) -> DiceConfig {
        self.dice
    }

    /// Risk classification policy.
    pub fn risk_threshold(&self) -> RiskThreshold {
        self.risk_threshold
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
            dice: DiceConfig::default(),
            risk_threshold: RiskThreshold::default(),
        }
    }
}
