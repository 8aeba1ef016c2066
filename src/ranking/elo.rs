//! Elo rating calculation and its configuration.

use serde::{Deserialize, Serialize};

/// Ratings are whole numbers; every adjustment is rounded up.
pub type Rating = i32;

/// Default k-factor (weight of a single match).
pub const DEFAULT_K_FACTOR: f64 = 40.0;

/// Default starting rating.
pub const DEFAULT_INITIAL_RATING: Rating = 1500;

/// Starting rating of the legacy profile.
pub const LEGACY_INITIAL_RATING: Rating = 1000;

/// Default rating floor.
pub const DEFAULT_FLOOR: Rating = 0;

/// Largest accepted k-factor.
pub const MAX_K_FACTOR: f64 = 1000.0;

/// Largest accepted magnitude for the initial rating and the floor.
pub const MAX_RATING_SETTING: Rating = 1_000_000;

/// Invalid algorithm settings.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// k-factor must be finite, greater than zero and at most [`MAX_K_FACTOR`].
    InvalidKFactor(f64),
    /// Initial rating or floor outside `-MAX_RATING_SETTING..=MAX_RATING_SETTING`.
    RatingOutOfRange { field: &'static str, value: Rating },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidKFactor(k) => write!(
                f,
                "k-factor must be a positive number of at most {} (got {})",
                MAX_K_FACTOR, k
            ),
            ConfigError::RatingOutOfRange { field, value } => write!(
                f,
                "{} must be between -{} and {} (got {})",
                field, MAX_RATING_SETTING, MAX_RATING_SETTING, value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Whether the configured floor limits ratings after an adjustment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorPolicy {
    /// Floor is recorded but ratings may drop below it.
    #[default]
    Ignore,
    /// Ratings never drop below the floor.
    Clamp,
}

/// How a match with more than two players is rated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiOpponentPolicy {
    /// Average the raw pairwise deltas against every opponent, then round up once.
    #[default]
    Average,
    /// Reject matches with more than two players.
    TwoPlayerOnly,
}

/// Algorithm settings. Deserializes with per-field defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EloConfig {
    pub k_factor: f64,
    pub floor: Rating,
    pub initial_rating: Rating,
    pub floor_policy: FloorPolicy,
    pub multi_opponent: MultiOpponentPolicy,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            floor: DEFAULT_FLOOR,
            initial_rating: DEFAULT_INITIAL_RATING,
            floor_policy: FloorPolicy::Ignore,
            multi_opponent: MultiOpponentPolicy::Average,
        }
    }
}

impl EloConfig {
    /// Validated config with the given floor and k-factor.
    pub fn new(floor: Rating, k_factor: f64) -> Result<Self, ConfigError> {
        let config = Self {
            k_factor,
            floor,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Profile that starts everyone at 1000.
    pub fn legacy() -> Self {
        Self::default().with_initial_rating(LEGACY_INITIAL_RATING)
    }

    pub fn with_k_factor(mut self, k_factor: f64) -> Self {
        self.k_factor = k_factor;
        self
    }

    pub fn with_initial_rating(mut self, rating: Rating) -> Self {
        self.initial_rating = rating;
        self
    }

    pub fn with_floor(mut self, floor: Rating, policy: FloorPolicy) -> Self {
        self.floor = floor;
        self.floor_policy = policy;
        self
    }

    pub fn with_multi_opponent(mut self, policy: MultiOpponentPolicy) -> Self {
        self.multi_opponent = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 || self.k_factor > MAX_K_FACTOR {
            return Err(ConfigError::InvalidKFactor(self.k_factor));
        }
        for (field, value) in [("initial_rating", self.initial_rating), ("floor", self.floor)] {
            if !(-MAX_RATING_SETTING..=MAX_RATING_SETTING).contains(&value) {
                return Err(ConfigError::RatingOutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Rating after applying the floor policy.
    pub fn apply_floor(&self, rating: Rating) -> Rating {
        match self.floor_policy {
            FloorPolicy::Ignore => rating,
            FloorPolicy::Clamp => rating.max(self.floor),
        }
    }

    /// [`adjustment`] with this config's k-factor.
    pub fn adjustment(&self, rating: Rating, opponent: Rating, actual_score: f64) -> Rating {
        adjustment(rating, opponent, actual_score, self.k_factor)
    }
}

/// Expected score of a player rated `rating_a` against `rating_b`, in (0, 1).
/// Exactly 0.5 for equal ratings.
pub fn expected_score(rating_a: Rating, rating_b: Rating) -> f64 {
    let diff = f64::from(rating_b) - f64::from(rating_a);
    1.0 / (1.0 + 10f64.powf(diff / 400.0))
}

/// Unrounded rating change `k * (actual - expected)`.
pub fn raw_delta(rating_a: Rating, rating_b: Rating, actual_score: f64, k_factor: f64) -> f64 {
    k_factor * (actual_score - expected_score(rating_a, rating_b))
}

/// Rating change for a player rated `rating_a` who scored `actual_score`
/// (1 win, 0 loss) against `rating_b`. Always rounded up: `ceil(19.2) == 20`,
/// `ceil(-19.8) == -19`.
pub fn adjustment(rating_a: Rating, rating_b: Rating, actual_score: f64, k_factor: f64) -> Rating {
    raw_delta(rating_a, rating_b, actual_score, k_factor).ceil() as Rating
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ratings_expect_half() {
        assert_eq!(expected_score(1500, 1500), 0.5);
        assert_eq!(expected_score(0, 0), 0.5);
    }

    #[test]
    fn higher_rated_expects_more() {
        let e = expected_score(1700, 1500);
        assert!(e > 0.75 && e < 0.77);
        let e = expected_score(1500, 1700);
        assert!(e > 0.23 && e < 0.25);
    }

    #[test]
    fn equal_ratings_win_and_loss() {
        assert_eq!(adjustment(1500, 1500, 1.0, 40.0), 20);
        assert_eq!(adjustment(1500, 1500, 0.0, 40.0), -20);
    }

    #[test]
    fn adjustment_rounds_up() {
        // 40 * (1 - 0.7597) = 9.61 -> 10
        assert_eq!(adjustment(1700, 1500, 1.0, 40.0), 10);
        // 40 * (0 - 0.7597) = -30.39 -> -30
        assert_eq!(adjustment(1700, 1500, 0.0, 40.0), -30);
        // 40 * (1 - 0.2403) = 30.39 -> 31
        assert_eq!(adjustment(1500, 1700, 1.0, 40.0), 31);
    }

    #[test]
    fn config_validation() {
        assert!(EloConfig::default().validate().is_ok());
        assert_eq!(
            EloConfig::new(0, 0.0),
            Err(ConfigError::InvalidKFactor(0.0))
        );
        assert!(EloConfig::new(0, -5.0).is_err());
        assert!(EloConfig::new(0, f64::NAN).is_err());
        assert!(EloConfig::new(100, 16.0).is_ok());
        assert!(EloConfig::new(0, MAX_K_FACTOR).is_ok());
    }

    #[test]
    fn config_rejects_settings_that_could_overflow() {
        assert_eq!(EloConfig::new(0, 1e10), Err(ConfigError::InvalidKFactor(1e10)));
        assert_eq!(
            EloConfig::default().with_initial_rating(i32::MAX).validate(),
            Err(ConfigError::RatingOutOfRange {
                field: "initial_rating",
                value: i32::MAX
            })
        );
        assert_eq!(
            EloConfig::default()
                .with_floor(i32::MIN, FloorPolicy::Clamp)
                .validate(),
            Err(ConfigError::RatingOutOfRange {
                field: "floor",
                value: i32::MIN
            })
        );
        let c: EloConfig = serde_json::from_str(r#"{"initial_rating": 2147483647}"#).unwrap();
        assert!(c.validate().is_err());
    }

    #[test]
    fn profiles() {
        assert_eq!(EloConfig::default().initial_rating, 1500);
        assert_eq!(EloConfig::legacy().initial_rating, 1000);
        assert_eq!(EloConfig::default().k_factor, 40.0);
    }

    #[test]
    fn floor_policy() {
        let ignore = EloConfig::default().with_floor(100, FloorPolicy::Ignore);
        assert_eq!(ignore.apply_floor(90), 90);
        let clamp = EloConfig::default().with_floor(100, FloorPolicy::Clamp);
        assert_eq!(clamp.apply_floor(90), 100);
        assert_eq!(clamp.apply_floor(110), 110);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let c: EloConfig = serde_json::from_str(r#"{"k_factor": 32}"#).unwrap();
        assert_eq!(c.k_factor, 32.0);
        assert_eq!(c.initial_rating, DEFAULT_INITIAL_RATING);
        let c: EloConfig =
            serde_json::from_str(r#"{"floor": 1400, "floor_policy": "clamp"}"#).unwrap();
        assert_eq!(c.floor_policy, FloorPolicy::Clamp);
        assert_eq!(c.apply_floor(1300), 1400);
    }
}
