//! Player: a user's participation in one tournament.

use crate::models::tournament::TournamentId;
use crate::models::user::{User, UserId};
use serde::Serialize;
use std::hash::{Hash, Hasher};

/// Players are keyed by their user's id within a tournament.
pub type PlayerId = UserId;

/// A user registered in a tournament.
#[derive(Clone, Debug, Serialize)]
pub struct Player {
    user: User,
    tournament_id: TournamentId,
    /// Display nickname; the user's tag when none was given at join time.
    nickname: String,
}

impl Player {
    pub(crate) fn new(user: User, tournament_id: TournamentId, nickname: Option<String>) -> Self {
        let nickname = nickname
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| user.tag());
        Self {
            user,
            tournament_id,
            nickname,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.user.id()
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.tournament_id == other.tournament_id && self.user == other.user
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.user.hash(state);
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.nickname)
    }
}
