//! Ranking pass: replay the match history in order and rate every player.

use crate::models::{Match, MatchError, PlayerId, Tournament};
use crate::ranking::elo::{raw_delta, ConfigError, EloConfig, MultiOpponentPolicy, Rating};
use crate::ranking::leaderboard::Leaderboard;
use crate::ranking::observer::RankingObserver;
use crate::ranking::stats::{Stats, StatsTable};

/// Errors that abort a ranking pass. No leaderboard is produced.
#[derive(Clone, Debug, PartialEq)]
pub enum RankingError {
    InvalidConfig(ConfigError),
    /// A match participant has no stats entry (not a tournament player).
    MissingStats { match_index: usize, player: PlayerId },
    /// The match's own membership check failed.
    Membership { match_index: usize, source: MatchError },
    /// Match size not supported by the configured policy.
    UnsupportedMatchSize { match_index: usize, players: usize },
    /// The player's rating left the representable range.
    RatingOverflow { match_index: usize, player: PlayerId },
}

impl std::fmt::Display for RankingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingError::InvalidConfig(e) => write!(f, "Invalid ranking config: {}", e),
            RankingError::MissingStats {
                match_index,
                player,
            } => write!(f, "match {}: no stats for player {}", match_index, player),
            RankingError::Membership {
                match_index,
                source,
            } => write!(f, "match {}: {}", match_index, source),
            RankingError::UnsupportedMatchSize {
                match_index,
                players,
            } => write!(
                f,
                "match {}: cannot rate a match with {} players",
                match_index, players
            ),
            RankingError::RatingOverflow {
                match_index,
                player,
            } => write!(f, "match {}: rating of player {} overflowed", match_index, player),
        }
    }
}

impl std::error::Error for RankingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RankingError::InvalidConfig(e) => Some(e),
            RankingError::Membership { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for RankingError {
    fn from(e: ConfigError) -> Self {
        RankingError::InvalidConfig(e)
    }
}

/// Elo ranking over one tournament's history.
#[derive(Clone, Debug)]
pub struct RankingEngine {
    config: EloConfig,
}

impl RankingEngine {
    pub fn new(config: EloConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EloConfig {
        &self.config
    }

    /// Rank every player of `tournament`.
    ///
    /// 1. Every player starts at the initial rating with no matches.
    /// 2. Matches are replayed in play order. All adjustments for a match are
    ///    computed from the ratings before it, then committed together.
    /// 3. The final table is sorted into a [`Leaderboard`].
    pub fn rank(
        &self,
        tournament: &Tournament,
        observer: &mut dyn RankingObserver,
    ) -> Result<Leaderboard, RankingError> {
        observer.on_start(tournament);

        let initial = tournament
            .players()
            .iter()
            .map(|p| Stats::initial(p.clone(), self.config.initial_rating));
        let mut table = StatsTable::new(initial);

        for (i, game) in tournament.matches().iter().enumerate() {
            let updates = self.rate_match(&table, i, game, observer)?;
            table = table.merge(updates);
            observer.on_match(i, game);
        }

        let leaderboard = Leaderboard::from_table(tournament, &table);
        observer.on_finish(&leaderboard);
        Ok(leaderboard)
    }

    /// Updated stats for every participant of one match, computed from `snapshot`.
    fn rate_match(
        &self,
        snapshot: &StatsTable,
        match_index: usize,
        game: &Match,
        observer: &mut dyn RankingObserver,
    ) -> Result<Vec<Stats>, RankingError> {
        let size = game.players().len();
        let too_many = size > 2 && self.config.multi_opponent == MultiOpponentPolicy::TwoPlayerOnly;
        if size < 2 || too_many {
            return Err(RankingError::UnsupportedMatchSize {
                match_index,
                players: size,
            });
        }

        let winner = game.get_winner();
        let mut updates = Vec::with_capacity(size);
        for &id in game.players() {
            let stats = lookup(snapshot, match_index, id)?;
            let opponents = game
                .opponents_of(id)
                .map_err(|source| RankingError::Membership {
                    match_index,
                    source,
                })?;

            let won = winner == Some(id);
            let actual = if won { 1.0 } else { 0.0 };
            let mut total = 0.0;
            for &opp in &opponents {
                let opp_rating = lookup(snapshot, match_index, opp)?.rating();
                total += raw_delta(stats.rating(), opp_rating, actual, self.config.k_factor);
            }
            let adjustment = (total / opponents.len() as f64).ceil() as Rating;

            observer.on_adjustment(match_index, stats.player(), adjustment);
            let updated = stats
                .after_match(adjustment, won, &self.config)
                .ok_or(RankingError::RatingOverflow { match_index, player: id })?;
            updates.push(updated);
        }
        Ok(updates)
    }
}

fn lookup(snapshot: &StatsTable, match_index: usize, player: PlayerId) -> Result<&Stats, RankingError> {
    snapshot
        .get(player)
        .ok_or(RankingError::MissingStats {
            match_index,
            player,
        })
}
