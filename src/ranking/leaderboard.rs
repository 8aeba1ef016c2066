//! Leaderboard: ranked snapshot of a tournament at the end of a ranking pass.

use crate::models::{PlayerId, Tournament, TournamentId};
use crate::ranking::stats::{Stats, StatsTable};
use serde::Serialize;

/// Errors from leaderboard lookups.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeaderboardError {
    /// Places are 1-based and limited to the ranked players.
    PlaceOutOfRange { place: usize, ranked: usize },
}

impl std::fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaderboardError::PlaceOutOfRange { place, ranked } => write!(
                f,
                "No place {} (places run from 1 to {})",
                place, ranked
            ),
        }
    }
}

impl std::error::Error for LeaderboardError {}

/// Immutable standings. Players without matches are listed apart from the
/// placements, in join order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Leaderboard {
    tournament_id: TournamentId,
    title: String,
    version: u64,
    ranked: Vec<Stats>,
    unranked: Vec<Stats>,
}

impl Leaderboard {
    /// Sort `table` into placements. The sort is stable, so players that tie
    /// on rating and win rate keep join order.
    pub(crate) fn from_table(tournament: &Tournament, table: &StatsTable) -> Self {
        let (mut ranked, unranked): (Vec<Stats>, Vec<Stats>) = table
            .iter()
            .cloned()
            .partition(|s| s.matches_played() > 0);
        ranked.sort_by(Stats::cmp_placement);
        Self {
            tournament_id: tournament.id(),
            title: tournament.title().to_string(),
            version: table.version(),
            ranked,
            unranked,
        }
    }

    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Stats table version the snapshot was taken from (one per match processed).
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Stats at 1-based `place`.
    pub fn get_by_place(&self, place: usize) -> Result<&Stats, LeaderboardError> {
        place
            .checked_sub(1)
            .and_then(|i| self.ranked.get(i))
            .ok_or(LeaderboardError::PlaceOutOfRange {
                place,
                ranked: self.ranked.len(),
            })
    }

    /// Placed players, best first.
    pub fn ranked(&self) -> &[Stats] {
        &self.ranked
    }

    /// Players with no matches.
    pub fn unranked(&self) -> &[Stats] {
        &self.unranked
    }

    /// Number of placed players.
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Stats for a player, placed or not.
    pub fn stats_for(&self, player: PlayerId) -> Option<&Stats> {
        self.ranked
            .iter()
            .chain(self.unranked.iter())
            .find(|s| s.player_id() == player)
    }

    /// 1-based place of a player; `None` if the player has no matches.
    pub fn place_of(&self, player: PlayerId) -> Option<usize> {
        self.ranked
            .iter()
            .position(|s| s.player_id() == player)
            .map(|i| i + 1)
    }
}
