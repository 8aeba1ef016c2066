//! Per-player running stats and the copy-on-write table the ranking pass layers them into.

use crate::models::{Player, PlayerId};
use crate::ranking::elo::{EloConfig, Rating};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// A player's standing after some prefix of the match history.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stats {
    player: Player,
    rating: Rating,
    matches_played: u32,
    matches_won: u32,
}

impl Stats {
    /// Stats before any match.
    pub fn initial(player: Player, rating: Rating) -> Self {
        Self {
            player,
            rating,
            matches_played: 0,
            matches_won: 0,
        }
    }

    /// New stats after one more match; `self` is left untouched.
    /// `None` if the rating or a counter would overflow.
    pub fn after_match(&self, adjustment: Rating, won: bool, config: &EloConfig) -> Option<Self> {
        Some(Self {
            player: self.player.clone(),
            rating: config.apply_floor(self.rating.checked_add(adjustment)?),
            matches_played: self.matches_played.checked_add(1)?,
            matches_won: self.matches_won.checked_add(u32::from(won))?,
        })
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_id(&self) -> PlayerId {
        self.player.id()
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn matches_played(&self) -> u32 {
        self.matches_played
    }

    pub fn matches_won(&self) -> u32 {
        self.matches_won
    }

    /// Fraction of matches won; `None` before the first match.
    pub fn win_rate(&self) -> Option<f64> {
        (self.matches_played > 0)
            .then(|| f64::from(self.matches_won) / f64::from(self.matches_played))
    }

    /// Leaderboard order: rating descending, then win rate descending.
    ///
    /// Win rates are compared as `won_a * played_b` vs `won_b * played_a`, so
    /// zero-match stats never divide by zero (they compare as equal on rate).
    pub fn cmp_placement(&self, other: &Self) -> Ordering {
        other.rating.cmp(&self.rating).then_with(|| {
            if self.matches_played == 0 || other.matches_played == 0 {
                return Ordering::Equal;
            }
            let lhs = u64::from(self.matches_won) * u64::from(other.matches_played);
            let rhs = u64::from(other.matches_won) * u64::from(self.matches_played);
            rhs.cmp(&lhs)
        })
    }
}

/// Versioned map from player to stats.
///
/// [`StatsTable::merge`] builds a new table; entries not in the update are
/// shared with the old one, so an earlier table is never changed by a later pass step.
#[derive(Clone, Debug)]
pub struct StatsTable {
    order: Vec<PlayerId>,
    entries: HashMap<PlayerId, Arc<Stats>>,
    version: u64,
}

impl StatsTable {
    /// Version 0 table with one entry per stats value, in the given order.
    pub fn new(initial: impl IntoIterator<Item = Stats>) -> Self {
        let mut order = Vec::new();
        let mut entries = HashMap::new();
        for stats in initial {
            let id = stats.player_id();
            if entries.insert(id, Arc::new(stats)).is_none() {
                order.push(id);
            }
        }
        Self {
            order,
            entries,
            version: 0,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Stats> {
        self.entries.get(&id).map(Arc::as_ref)
    }

    /// Shared handle to an entry (lets callers check sharing between versions).
    pub fn get_shared(&self, id: PlayerId) -> Option<&Arc<Stats>> {
        self.entries.get(&id)
    }

    /// A new table with `updates` replacing the entries for their players.
    /// Players not yet in the table are appended after the existing order.
    pub fn merge(&self, updates: impl IntoIterator<Item = Stats>) -> Self {
        let mut next = self.clone();
        for stats in updates {
            let id = stats.player_id();
            if next.entries.insert(id, Arc::new(stats)).is_none() {
                next.order.push(id);
            }
        }
        next.version = self.version + 1;
        next
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Stats> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.entries.get(id).map(Arc::as_ref))
    }
}
