//! Integration tests for tournaments: membership, match creation, sessions.

use chrono::{TimeZone, Utc};
use shen_ranking::{Session, Tournament, TournamentError, User, DEFAULT_BEST_OF};

#[test]
fn players_keep_join_order_and_nicknames() {
    let a = User::new("Alice").with_discriminator("0001");
    let b = User::new("Bob").with_discriminator("0002");
    let mut t = Tournament::new("Weekly");
    t.add_player(&a, None).unwrap();
    t.add_player(&b, Some("bobby")).unwrap();

    let names: Vec<_> = t.players().iter().map(|p| p.nickname().to_string()).collect();
    assert_eq!(names, vec!["Alice#0001", "bobby"]);
    assert_eq!(t.player(a.id()).unwrap().user(), &a);
    assert_eq!(t.player(b.id()).unwrap().tournament_id(), t.id());
}

#[test]
fn duplicate_add_fails() {
    let a = User::new("A");
    let mut t = Tournament::new("T");
    t.add_player(&a, None).unwrap();
    assert!(t.is_participant(a.id()));
    assert!(matches!(
        t.add_player(&a, Some("again")),
        Err(TournamentError::DuplicatePlayer(id)) if id == a.id()
    ));
    assert_eq!(t.players().len(), 1);
}

#[test]
fn same_name_users_are_distinct_players() {
    let a = User::new("Sam").with_discriminator("1234");
    let b = User::new("Sam").with_discriminator("1234");
    let t = Tournament::with_users("T", [&a, &b]).unwrap();
    assert_eq!(t.players().len(), 2);
    assert_ne!(t.players()[0], t.players()[1]);
}

#[test]
fn player_lookup_fails_for_non_member() {
    let a = User::new("A");
    let stranger = User::new("S");
    let t = Tournament::with_users("T", [&a]).unwrap();
    assert_eq!(
        t.player(stranger.id()).unwrap_err(),
        TournamentError::NotAParticipant(stranger.id())
    );
}

#[test]
fn start_match_with_non_member_creates_nothing() {
    let a = User::new("A");
    let b = User::new("B");
    let stranger = User::new("S");
    let mut t = Tournament::with_users("T", [&a, &b]).unwrap();

    let err = t.start_match(&[&a, &stranger], DEFAULT_BEST_OF).unwrap_err();
    assert_eq!(err, TournamentError::NotAParticipant(stranger.id()));
    assert!(t.matches().is_empty());
}

#[test]
fn start_match_validates_shape() {
    let a = User::new("A");
    let b = User::new("B");
    let mut t = Tournament::with_users("T", [&a, &b]).unwrap();

    assert_eq!(
        t.start_match(&[&a, &b], 4).unwrap_err(),
        TournamentError::InvalidBestOf(4)
    );
    assert_eq!(
        t.start_match(&[&a, &b], 0).unwrap_err(),
        TournamentError::InvalidBestOf(0)
    );
    assert_eq!(
        t.start_match(&[&a], 3).unwrap_err(),
        TournamentError::TooFewPlayers { given: 1 }
    );
    assert_eq!(
        t.start_match(&[&a, &a], 3).unwrap_err(),
        TournamentError::DuplicateParticipant(a.id())
    );
    assert!(t.matches().is_empty());
}

#[test]
fn matches_append_in_play_order() {
    let a = User::new("A");
    let b = User::new("B");
    let c = User::new("C");
    let mut t = Tournament::with_users("T", [&a, &b, &c]).unwrap();

    let when = Utc.with_ymd_and_hms(2016, 5, 1, 18, 0, 0).unwrap();
    let first = t.start_match_at(&[&a, &b], 5, when).unwrap().id();
    let second = t.start_match(&[&b, &c], DEFAULT_BEST_OF).unwrap().id();

    let ids: Vec<_> = t.matches().iter().map(|m| m.id()).collect();
    assert_eq!(ids, vec![first, second]);

    let m = t.get_match(first).unwrap();
    assert_eq!(m.best_of(), 5);
    assert_eq!(m.time(), when);
    assert_eq!(m.tournament_id(), t.id());
    assert_eq!(m.players(), &[a.id(), b.id()]);
    assert_eq!(t.get_match(second).unwrap().best_of(), 3);

    t.match_mut(second).unwrap().record_win(&[c.id()]).unwrap();
    assert_eq!(t.get_match(second).unwrap().get_score(c.id()), 1);

    let missing = uuid::Uuid::new_v4();
    assert_eq!(
        t.get_match(missing).unwrap_err(),
        TournamentError::MatchNotFound(missing)
    );
}

#[test]
fn session_builds_tournaments() {
    let mut s = Session::new();
    let a = s.create_user("A");
    let b = s.create_user("B");
    let t = s.create_tournament("Club", &[&a, &b]).unwrap();
    assert_eq!(t.title(), "Club");
    assert_eq!(t.players().len(), 2);
    assert!(t.is_participant(a.id()) && t.is_participant(b.id()));

    assert_eq!(
        s.create_tournament("Dup", &[&a, &a]).unwrap_err(),
        TournamentError::DuplicatePlayer(a.id())
    );
}

#[test]
fn tournament_serializes() {
    let a = User::new("A");
    let b = User::new("B");
    let mut t = Tournament::with_users("T", [&a, &b]).unwrap();
    t.start_match(&[&a, &b], 3).unwrap().record_win(&[a.id()]).unwrap();

    let value = serde_json::to_value(&t).unwrap();
    assert_eq!(value["id"], t.id().to_string());
    assert_eq!(value["title"], "T");
    assert_eq!(value["players"].as_array().unwrap().len(), 2);
    assert_eq!(value["matches"][0]["best_of"], 3);
    assert_eq!(value["matches"][0]["rounds"][0]["winners"][0], a.id().to_string());
}
