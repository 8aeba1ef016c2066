//! Tournament: players in join order and matches in play order.

use crate::models::game::{Match, MatchId};
use crate::models::player::{Player, PlayerId};
use crate::models::user::{User, UserId};
use crate::ranking::{EloConfig, Leaderboard, LogObserver, RankingEngine, RankingError, RankingObserver};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Default number of rounds for a new match.
pub const DEFAULT_BEST_OF: u32 = 3;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// The user already has a player in this tournament.
    DuplicatePlayer(UserId),
    /// The user never joined this tournament.
    NotAParticipant(UserId),
    /// A match needs at least two players.
    TooFewPlayers { given: usize },
    /// The same user was named twice for one match.
    DuplicateParticipant(UserId),
    /// Best-of must be odd and at least 1.
    InvalidBestOf(u32),
    /// No match with this id in the tournament.
    MatchNotFound(MatchId),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::DuplicatePlayer(id) => {
                write!(f, "User {} is already in this tournament", id)
            }
            TournamentError::NotAParticipant(id) => {
                write!(f, "User {} is not in this tournament", id)
            }
            TournamentError::TooFewPlayers { given } => {
                write!(f, "A match needs at least 2 players (got {})", given)
            }
            TournamentError::DuplicateParticipant(id) => {
                write!(f, "User {} appears twice in the match", id)
            }
            TournamentError::InvalidBestOf(n) => {
                write!(f, "Best-of must be an odd number of at least 1 (got {})", n)
            }
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Aggregate root: owns its players and its match history.
#[derive(Clone, Debug, Serialize)]
pub struct Tournament {
    id: TournamentId,
    title: String,
    /// Join order.
    players: Vec<Player>,
    /// Play order; append-only.
    matches: Vec<Match>,
}

impl Tournament {
    /// Create an empty tournament.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            players: Vec::new(),
            matches: Vec::new(),
        }
    }

    /// Create a tournament and register `users` as players in the given order.
    pub fn with_users<'a>(
        title: impl Into<String>,
        users: impl IntoIterator<Item = &'a User>,
    ) -> Result<Self, TournamentError> {
        let mut t = Self::new(title);
        for user in users {
            t.add_player(user, None)?;
        }
        Ok(t)
    }

    pub fn id(&self) -> TournamentId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.players.iter().any(|p| p.id() == user_id)
    }

    /// Register `user`. Fails if the user already joined; callers that may
    /// re-add should check [`Tournament::is_participant`] first.
    pub fn add_player(
        &mut self,
        user: &User,
        nickname: Option<&str>,
    ) -> Result<&Player, TournamentError> {
        if self.is_participant(user.id()) {
            return Err(TournamentError::DuplicatePlayer(user.id()));
        }
        self.players.push(Player::new(
            user.clone(),
            self.id,
            nickname.map(str::to_owned),
        ));
        let n = self.players.len() - 1;
        Ok(&self.players[n])
    }

    /// The player for `user_id`, or `NotAParticipant`.
    pub fn player(&self, user_id: UserId) -> Result<&Player, TournamentError> {
        self.players
            .iter()
            .find(|p| p.id() == user_id)
            .ok_or(TournamentError::NotAParticipant(user_id))
    }

    pub fn get_match(&self, id: MatchId) -> Result<&Match, TournamentError> {
        self.matches
            .iter()
            .find(|m| m.id() == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    /// Mutable access for recording rounds. Matches cannot be removed.
    pub fn match_mut(&mut self, id: MatchId) -> Result<&mut Match, TournamentError> {
        self.matches
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    /// Start a match between registered users, timestamped now.
    pub fn start_match(
        &mut self,
        users: &[&User],
        best_of: u32,
    ) -> Result<&mut Match, TournamentError> {
        self.start_match_at(users, best_of, Utc::now())
    }

    /// Start a match with an explicit timestamp. Every check runs before the
    /// match is created, so a failed call leaves the history untouched.
    pub fn start_match_at(
        &mut self,
        users: &[&User],
        best_of: u32,
        time: DateTime<Utc>,
    ) -> Result<&mut Match, TournamentError> {
        if best_of == 0 || best_of % 2 == 0 {
            return Err(TournamentError::InvalidBestOf(best_of));
        }
        if users.len() < 2 {
            return Err(TournamentError::TooFewPlayers { given: users.len() });
        }
        let mut ids: Vec<PlayerId> = Vec::with_capacity(users.len());
        for user in users {
            let id = self.player(user.id())?.id();
            if ids.contains(&id) {
                return Err(TournamentError::DuplicateParticipant(id));
            }
            ids.push(id);
        }

        self.matches.push(Match::new(self.id, ids, best_of, time));
        let n = self.matches.len() - 1;
        Ok(&mut self.matches[n])
    }

    /// Rank all players over the match history, logging through `log`.
    pub fn generate_leaderboard(&self, config: &EloConfig) -> Result<Leaderboard, RankingError> {
        self.generate_leaderboard_with(config, &mut LogObserver)
    }

    /// Rank all players, reporting progress to `observer`.
    pub fn generate_leaderboard_with(
        &self,
        config: &EloConfig,
        observer: &mut dyn RankingObserver,
    ) -> Result<Leaderboard, RankingError> {
        RankingEngine::new(config.clone())?.rank(self, observer)
    }
}
