//! Session: the users known to one ranking run and the tournaments built from them.

use crate::models::tournament::{Tournament, TournamentError};
use crate::models::user::{User, UserId};
use std::collections::HashMap;

/// Errors from user lookups.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionError {
    UserNotFound(UserId),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::UserNotFound(id) => write!(f, "No user with id {}", id),
        }
    }
}

impl std::error::Error for SessionError {}

/// User registry. Users are kept in registration order.
#[derive(Clone, Debug, Default)]
pub struct Session {
    users: Vec<User>,
    index: HashMap<UserId, usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a user with a fresh id and random discriminator.
    pub fn create_user(&mut self, name: impl Into<String>) -> User {
        let user = User::new(name);
        self.add_user(user.clone());
        user
    }

    /// Register an existing user. A user with the same id is replaced in place.
    pub fn add_user(&mut self, user: User) {
        match self.index.get(&user.id()) {
            Some(&i) => self.users[i] = user,
            None => {
                self.index.insert(user.id(), self.users.len());
                self.users.push(user);
            }
        }
    }

    pub fn user(&self, id: UserId) -> Result<&User, SessionError> {
        self.index
            .get(&id)
            .map(|&i| &self.users[i])
            .ok_or(SessionError::UserNotFound(id))
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Build a tournament whose players are `users`, joined in order.
    pub fn create_tournament(
        &self,
        title: impl Into<String>,
        users: &[&User],
    ) -> Result<Tournament, TournamentError> {
        Tournament::with_users(title, users.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_lookup_users() {
        let mut s = Session::new();
        let a = s.create_user("A");
        let b = s.create_user("A");
        assert_ne!(a, b);
        assert_eq!(s.users().len(), 2);
        assert_eq!(s.user(a.id()).unwrap().name(), "A");

        let missing = User::new("ghost");
        assert_eq!(
            s.user(missing.id()),
            Err(SessionError::UserNotFound(missing.id()))
        );
    }

    #[test]
    fn add_user_replaces_same_id() {
        let mut s = Session::new();
        let a = s.create_user("A");
        s.add_user(User::with_id(a.id(), "A2"));
        assert_eq!(s.users().len(), 1);
        assert_eq!(s.user(a.id()).unwrap().name(), "A2");
    }
}
