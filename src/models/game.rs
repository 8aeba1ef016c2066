//! Match and Round: round history, scores, and winner resolution.

use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Free-form metadata (map name, stage, character, ...).
pub type RoundMeta = BTreeMap<String, String>;

/// Errors from recording or reading rounds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MatchError {
    /// The player is not one of this match's participants.
    NotAParticipant(PlayerId),
    /// A round needs at least one winner.
    NoWinners,
    /// The same player was named twice as a round winner.
    DuplicateWinner(PlayerId),
    /// `best_of` rounds have already been recorded.
    RoundLimitReached { best_of: u32 },
    /// No round at this index.
    RoundNotFound(usize),
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchError::NotAParticipant(id) => write!(f, "Player {} is not in this match", id),
            MatchError::NoWinners => write!(f, "A round needs at least one winner"),
            MatchError::DuplicateWinner(id) => write!(f, "Player {} listed twice as winner", id),
            MatchError::RoundLimitReached { best_of } => {
                write!(f, "Match is best of {} and all rounds are recorded", best_of)
            }
            MatchError::RoundNotFound(n) => write!(f, "No round {}", n),
        }
    }
}

impl std::error::Error for MatchError {}

/// One game within a match.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Round {
    /// Normally one player; ties are recorded as several.
    pub winners: Vec<PlayerId>,
    pub meta: RoundMeta,
    pub player_meta: BTreeMap<PlayerId, RoundMeta>,
}

impl Round {
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winners.contains(&player)
    }
}

/// A contest between a fixed set of players, decided by accumulated round wins.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Match {
    id: MatchId,
    tournament_id: TournamentId,
    players: Vec<PlayerId>,
    best_of: u32,
    time: DateTime<Utc>,
    rounds: Vec<Round>,
}

impl Match {
    /// Participants are validated by the owning tournament.
    pub(crate) fn new(
        tournament_id: TournamentId,
        players: Vec<PlayerId>,
        best_of: u32,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            players,
            best_of,
            time,
            rounds: Vec::new(),
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    /// Participants in the order they were given when the match started.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn best_of(&self) -> u32 {
        self.best_of
    }

    /// Round wins that guarantee the match (3 for best of 5).
    pub fn wins_needed(&self) -> u32 {
        self.best_of / 2 + 1
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn get_round(&self, n: usize) -> Option<&Round> {
        self.rounds.get(n)
    }

    pub fn has_player(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Record a round won by `winners`. Nothing is appended on error.
    pub fn record_win(&mut self, winners: &[PlayerId]) -> Result<&Round, MatchError> {
        self.record_win_with_meta(winners, RoundMeta::new(), BTreeMap::new())
    }

    /// Record a round with round-level and per-player metadata.
    pub fn record_win_with_meta(
        &mut self,
        winners: &[PlayerId],
        meta: RoundMeta,
        player_meta: BTreeMap<PlayerId, RoundMeta>,
    ) -> Result<&Round, MatchError> {
        if self.rounds.len() >= self.best_of as usize {
            return Err(MatchError::RoundLimitReached {
                best_of: self.best_of,
            });
        }
        if winners.is_empty() {
            return Err(MatchError::NoWinners);
        }
        for (i, &w) in winners.iter().enumerate() {
            if !self.has_player(w) {
                return Err(MatchError::NotAParticipant(w));
            }
            if winners[..i].contains(&w) {
                return Err(MatchError::DuplicateWinner(w));
            }
        }
        if let Some(&outsider) = player_meta.keys().find(|p| !self.has_player(**p)) {
            return Err(MatchError::NotAParticipant(outsider));
        }

        self.rounds.push(Round {
            winners: winners.to_vec(),
            meta,
            player_meta,
        });
        let n = self.rounds.len() - 1;
        Ok(&self.rounds[n])
    }

    /// Attach metadata to an already recorded round (winners stay fixed).
    pub fn annotate_round(
        &mut self,
        n: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), MatchError> {
        let round = self.rounds.get_mut(n).ok_or(MatchError::RoundNotFound(n))?;
        round.meta.insert(key.into(), value.into());
        Ok(())
    }

    /// Number of rounds `player` has won.
    pub fn get_score(&self, player: PlayerId) -> u32 {
        self.rounds.iter().filter(|r| r.is_winner(player)).count() as u32
    }

    fn high_score(&self) -> u32 {
        self.players
            .iter()
            .map(|&p| self.get_score(p))
            .max()
            .unwrap_or(0)
    }

    /// The single player with the strictly highest score.
    ///
    /// `None` when nobody has won a round or when two or more players share
    /// the top score.
    pub fn get_winner(&self) -> Option<PlayerId> {
        let high = self.high_score();
        if high == 0 {
            return None;
        }
        let mut leaders = self.players.iter().filter(|&&p| self.get_score(p) == high);
        match (leaders.next(), leaders.next()) {
            (Some(&winner), None) => Some(winner),
            _ => None,
        }
    }

    /// Every player at the top score, ties included, in participant order.
    /// Before any round is won everyone shares the top score of zero.
    pub fn get_all_winners(&self) -> Vec<PlayerId> {
        let high = self.high_score();
        self.players
            .iter()
            .copied()
            .filter(|&p| self.get_score(p) == high)
            .collect()
    }

    /// All other participants, in participant order.
    pub fn opponents_of(&self, player: PlayerId) -> Result<Vec<PlayerId>, MatchError> {
        if !self.has_player(player) {
            return Err(MatchError::NotAParticipant(player));
        }
        Ok(self.players.iter().copied().filter(|&p| p != player).collect())
    }

    pub fn is_finished(&self) -> bool {
        self.get_winner().is_some()
    }
}
