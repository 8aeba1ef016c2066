//! Progress events from a ranking pass, delivered to an injected observer.

use crate::models::{Match, Player, Tournament};
use crate::ranking::elo::Rating;
use crate::ranking::leaderboard::Leaderboard;

/// Receives events while a tournament is ranked. All methods default to no-ops.
pub trait RankingObserver {
    fn on_start(&mut self, _tournament: &Tournament) {}

    /// One participant's rating change for the match at `match_index`.
    fn on_adjustment(&mut self, _match_index: usize, _player: &Player, _adjustment: Rating) {}

    fn on_match(&mut self, _match_index: usize, _game: &Match) {}

    fn on_finish(&mut self, _leaderboard: &Leaderboard) {}
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RankingObserver for NoopObserver {}

/// Forwards events to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl RankingObserver for LogObserver {
    fn on_start(&mut self, tournament: &Tournament) {
        log::info!(
            "Ranking \"{}\": {} player(s), {} match(es)",
            tournament.title(),
            tournament.players().len(),
            tournament.matches().len()
        );
    }

    fn on_adjustment(&mut self, match_index: usize, player: &Player, adjustment: Rating) {
        log::debug!("match {}: {} {:+}", match_index, player, adjustment);
    }

    fn on_match(&mut self, match_index: usize, game: &Match) {
        if !game.is_finished() {
            log::warn!(
                "match {} ({}) has no winner; all participants scored as losses",
                match_index,
                game.id()
            );
        }
    }

    fn on_finish(&mut self, leaderboard: &Leaderboard) {
        for (i, stats) in leaderboard.ranked().iter().enumerate() {
            log::info!("{}: {} ({})", i + 1, stats.player(), stats.rating());
        }
        if !leaderboard.unranked().is_empty() {
            log::info!("{} player(s) with no matches", leaderboard.unranked().len());
        }
    }
}
