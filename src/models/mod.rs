//! Data structures for ranking: users, players, matches, rounds, tournaments.

mod game;
mod player;
mod session;
mod tournament;
mod user;

pub use game::{Match, MatchError, MatchId, Round, RoundMeta};
pub use player::{Player, PlayerId};
pub use session::{Session, SessionError};
pub use tournament::{Tournament, TournamentError, TournamentId, DEFAULT_BEST_OF};
pub use user::{gen_discriminator, User, UserId};
