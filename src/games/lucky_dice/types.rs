//! Core domain types for lucky dice.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Faces on a die when the configured count is unusable.
pub const DEFAULT_FACE_COUNT: u32 = 6;

/// Dice thrown per roll when the configured count is unusable.
pub const DEFAULT_DICE_COUNT: u32 = 1;

/// Score a player must land on exactly to win.
pub const DEFAULT_TARGET_SCORE: u32 = 21;

/// Largest accepted face count.
pub const MAX_FACE_COUNT: u32 = 1_000;

/// Largest accepted number of dice per roll.
pub const MAX_DICE_COUNT: u32 = 100;

/// Largest accepted target score.
///
/// With the face and dice limits, a score below the target plus the largest
/// possible roll stays far inside `u32`, so totals and scores never saturate.
pub const MAX_TARGET_SCORE: u32 = 1_000_000;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PlayerId {
    /// Player 1 (always acts first).
    #[display("Player 1")]
    One,
    /// Player 2.
    #[display("Player 2")]
    Two,
}

impl PlayerId {
    /// Both players in seating order.
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Returns the other player.
    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Index into a two-slot score table.
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// Seat number as stored in the history database (1 or 2).
    pub fn number(self) -> i32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Parses a stored seat number.
    pub fn from_number(number: i32) -> Option<Self> {
        match number {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }
}

/// A correction applied while normalizing user-supplied settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConfigIssue {
    /// Face count was below 2 or above [`MAX_FACE_COUNT`].
    #[display("face count {} is out of range, using {}", _0, DEFAULT_FACE_COUNT)]
    FaceCount(i64),
    /// Dice count was below 1 or above [`MAX_DICE_COUNT`].
    #[display("dice count {} is out of range, using {}", _0, DEFAULT_DICE_COUNT)]
    DiceCount(i64),
    /// Target score was below 1 or above [`MAX_TARGET_SCORE`].
    #[display("target score {} is out of range, using {}", _0, DEFAULT_TARGET_SCORE)]
    TargetScore(i64),
}

/// A settings value together with the corrections that produced it.
///
/// Out-of-range input never fails: it is replaced by a default and the
/// replacement is reported here so the caller can surface it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T> {
    value: T,
    issues: Vec<ConfigIssue>,
}

impl<T> Normalized<T> {
    /// Wraps a value with the issues found while building it.
    pub fn new(value: T, issues: Vec<ConfigIssue>) -> Self {
        Self { value, issues }
    }

    /// Returns the normalized value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the wrapper, returning the normalized value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Corrections applied during normalization.
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    /// Returns true if any input was replaced by a default.
    pub fn was_corrected(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Shape of the dice thrown on every roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceConfig {
    face_count: u32,
    dice_count: u32,
}

impl DiceConfig {
    /// Builds a dice configuration, coercing out-of-range counts to the defaults.
    #[instrument]
    pub fn new(face_count: i64, dice_count: i64) -> Normalized<Self> {
        let mut issues = Vec::new();

        let face_count = match u32::try_from(face_count) {
            Ok(faces) if (2..=MAX_FACE_COUNT).contains(&faces) => faces,
            _ => {
                issues.push(ConfigIssue::FaceCount(face_count));
                DEFAULT_FACE_COUNT
            }
        };

        let dice_count = match u32::try_from(dice_count) {
            Ok(count) if (1..=MAX_DICE_COUNT).contains(&count) => count,
            _ => {
                issues.push(ConfigIssue::DiceCount(dice_count));
                DEFAULT_DICE_COUNT
            }
        };

        Normalized::new(
            Self {
                face_count,
                dice_count,
            },
            issues,
        )
    }

    /// Number of faces on each die (at least 2).
    pub fn face_count(&self) -> u32 {
        self.face_count
    }

    /// Number of dice thrown per roll (at least 1).
    pub fn dice_count(&self) -> u32 {
        self.dice_count
    }

    /// Returns true when rolls use a single die.
    pub fn is_single_die(&self) -> bool {
        self.dice_count == 1
    }
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            face_count: DEFAULT_FACE_COUNT,
            dice_count: DEFAULT_DICE_COUNT,
        }
    }
}

/// Values shown by one throw of the dice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RollOutcome {
    values: Vec<u32>,
    total: u32,
}

impl RollOutcome {
    /// Creates an outcome from the face values, in throw order.
    pub fn new(values: Vec<u32>) -> Self {
        let total = values.iter().fold(0u32, |sum, v| sum.saturating_add(*v));
        Self { values, total }
    }

    /// Face values in throw order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Sum of all face values.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Returns true when the throw used a single die.
    pub fn is_single(&self) -> bool {
        self.values.len() == 1
    }

    /// A lone die showing 1 loses the game on the spot.
    ///
    /// Multi-die throws never trigger this, whatever the faces show.
    pub fn is_instant_loss(&self) -> bool {
        self.is_single() && self.total == 1
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.total)
        } else {
            let faces = self
                .values
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "[{}] = {}", faces, self.total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_flips() {
        assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
        assert_eq!(PlayerId::Two.opponent(), PlayerId::One);
    }

    #[test]
    fn test_player_number_parse() {
        assert_eq!(PlayerId::from_number(1), Some(PlayerId::One));
        assert_eq!(PlayerId::from_number(2), Some(PlayerId::Two));
        assert_eq!(PlayerId::from_number(0), None);
        assert_eq!(PlayerId::Two.number(), 2);
    }

    #[test]
    fn test_dice_config_accepts_valid_counts() {
        let config = DiceConfig::new(8, 3);
        assert!(!config.was_corrected());
        assert_eq!(config.value().face_count(), 8);
        assert_eq!(config.value().dice_count(), 3);
    }

    #[test]
    fn test_dice_config_coerces_to_defaults() {
        let config = DiceConfig::new(1, 0);
        assert_eq!(config.value(), &DiceConfig::default());
        assert_eq!(
            config.issues(),
            &[ConfigIssue::FaceCount(1), ConfigIssue::DiceCount(0)]
        );
    }

    #[test]
    fn test_dice_config_rejects_negative_and_huge() {
        let config = DiceConfig::new(-4, i64::from(u32::MAX) + 1);
        assert_eq!(config.issues().len(), 2);
        assert_eq!(config.into_value(), DiceConfig::default());
    }

    #[test]
    fn test_dice_config_upper_limits() {
        let config = DiceConfig::new(i64::from(MAX_FACE_COUNT), i64::from(MAX_DICE_COUNT));
        assert!(!config.was_corrected());

        let config = DiceConfig::new(i64::from(MAX_FACE_COUNT) + 1, i64::from(u32::MAX));
        assert_eq!(
            config.issues(),
            &[
                ConfigIssue::FaceCount(i64::from(MAX_FACE_COUNT) + 1),
                ConfigIssue::DiceCount(i64::from(u32::MAX)),
            ]
        );
        assert_eq!(config.into_value(), DiceConfig::default());
    }

    #[test]
    fn test_roll_outcome_total_and_single() {
        let single = RollOutcome::new(vec![4]);
        assert!(single.is_single());
        assert_eq!(single.total(), 4);
        assert_eq!(single.to_string(), "4");

        let multi = RollOutcome::new(vec![3, 5, 1]);
        assert!(!multi.is_single());
        assert_eq!(multi.total(), 9);
        assert_eq!(multi.to_string(), "[3, 5, 1] = 9");
    }

    #[test]
    fn test_instant_loss_only_for_single_die() {
        assert!(RollOutcome::new(vec![1]).is_instant_loss());
        assert!(!RollOutcome::new(vec![1, 1]).is_instant_loss());
        assert!(!RollOutcome::new(vec![2]).is_instant_loss());
    }
}
