//! Tournament Elo ranking: library with models and the ranking engine.

pub mod models;
pub mod ranking;

pub use models::{
    Match, MatchError, MatchId, Player, PlayerId, Round, RoundMeta, Session, SessionError,
    Tournament, TournamentError, TournamentId, User, UserId, DEFAULT_BEST_OF,
};
pub use ranking::{
    adjustment, expected_score, ConfigError, EloConfig, FloorPolicy, Leaderboard,
    LeaderboardError, LogObserver, MultiOpponentPolicy, NoopObserver, RankingEngine,
    RankingError, RankingObserver, Rating, Stats, StatsTable, MAX_K_FACTOR, MAX_RATING_SETTING,
};
