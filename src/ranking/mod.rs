//! Rating and ranking: Elo math, running stats, the ranking pass, leaderboards.

mod elo;
mod engine;
mod leaderboard;
mod observer;
mod stats;

pub use elo::{
    adjustment, expected_score, raw_delta, ConfigError, EloConfig, FloorPolicy,
    MultiOpponentPolicy, Rating, DEFAULT_FLOOR, DEFAULT_INITIAL_RATING, DEFAULT_K_FACTOR,
    LEGACY_INITIAL_RATING, MAX_K_FACTOR, MAX_RATING_SETTING,
};
pub use engine::{RankingEngine, RankingError};
pub use leaderboard::{Leaderboard, LeaderboardError};
pub use observer::{LogObserver, NoopObserver, RankingObserver};
pub use stats::{Stats, StatsTable};
