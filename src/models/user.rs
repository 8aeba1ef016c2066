//! User identity: id, name, discriminator, nickname.

use rand::Rng;
use serde::Serialize;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Unique identifier for a user (stable across tournaments).
pub type UserId = Uuid;

/// Generate a 4-digit discriminator (`0000`..=`9999`).
///
/// Uniqueness is not enforced; two users may share a name and discriminator.
pub fn gen_discriminator<R: Rng>(rng: &mut R) -> String {
    format!("{:04}", rng.gen_range(0..10_000u32))
}

/// A user. Identity is the `id`; names are only display data.
#[derive(Clone, Debug, Serialize)]
pub struct User {
    id: UserId,
    name: String,
    discriminator: String,
    nickname: Option<String>,
}

impl User {
    /// Create a user with a fresh id and a random discriminator.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_rng(name, &mut rand::thread_rng())
    }

    /// Like [`User::new`], drawing the discriminator from `rng`.
    pub fn with_rng<R: Rng>(name: impl Into<String>, rng: &mut R) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            discriminator: gen_discriminator(rng),
            nickname: None,
        }
    }

    /// A user whose id is already known (e.g. handed over by an importer).
    pub fn with_id(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            ..Self::new(name)
        }
    }

    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = discriminator.into();
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// `"<name>#<discriminator>"`, the human-readable alias for the id.
    pub fn tag(&self) -> String {
        format!("{}#{}", self.name, self.discriminator)
    }

    /// Nickname if set, otherwise the plain name.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) {}", self.id, self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn discriminator_is_four_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let d = gen_discriminator(&mut rng);
            assert_eq!(d.len(), 4);
            assert!(d.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn equality_is_by_id_not_name() {
        let a = User::new("Fox").with_discriminator("0001");
        let b = User::new("Fox").with_discriminator("0001");
        assert_ne!(a, b);

        let a2 = User::with_id(a.id(), "Renamed");
        assert_eq!(a, a2);
    }

    #[test]
    fn tag_and_display_name() {
        let u = User::new("Marth").with_discriminator("0420");
        assert_eq!(u.tag(), "Marth#0420");
        assert_eq!(u.display_name(), "Marth");
        let u = u.with_nickname("M2K");
        assert_eq!(u.display_name(), "M2K");
        assert_eq!(u.tag(), "Marth#0420");
    }
}
