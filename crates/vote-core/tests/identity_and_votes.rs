// crates/vote-core/tests/identity_and_votes.rs
use vote_core::{
    Audience, ColorScoped, ConnectionId, ConnectionRegistry, ConnectionScoped, CoreError,
    IdentityMode, IdentityPolicy, InputMessage, OutputMessage, SetColor, Vote, VoteChange,
    VoteCoordinator, VoteStore,
};

const A: ConnectionId = ConnectionId(1);
const B: ConnectionId = ConnectionId(2);

fn set_color(color: &str) -> InputMessage {
    InputMessage::SetColor(SetColor {
        color: color.to_string(),
    })
}

fn vote(group: &str, option: Option<&str>) -> InputMessage {
    InputMessage::Vote(Vote {
        group: group.to_string(),
        option: option.map(str::to_string),
    })
}

fn connected(mode: IdentityMode, ids: &[ConnectionId]) -> VoteCoordinator {
    let mut coordinator = VoteCoordinator::new(mode);
    for id in ids {
        coordinator.process_message(*id, InputMessage::Connect);
    }
    coordinator
}

// -----------------------------------------------------------------------------
// Vote store
// -----------------------------------------------------------------------------

#[test]
fn same_vote_twice_is_idempotent() {
    let mut once = VoteStore::new();
    once.set_vote("g", "k", Some("x"));

    let mut twice = VoteStore::new();
    assert_eq!(twice.set_vote("g", "k", Some("x")), VoteChange::Recorded);
    assert_eq!(twice.set_vote("g", "k", Some("x")), VoteChange::Unchanged);

    assert_eq!(once, twice);
}

#[test]
fn deselection_removes_the_key() {
    let mut store = VoteStore::new();
    store.set_vote("g", "k", Some("X"));
    assert_eq!(store.set_vote("g", "k", Some("")), VoteChange::Cleared);

    let group = store.group("g").expect("group stays behind");
    assert!(!group.contains_key("k"));
    assert_eq!(store.get("g", "k"), None);

    // Clearing again, or in a group that never existed, changes nothing.
    assert_eq!(store.set_vote("g", "k", None), VoteChange::Unchanged);
    assert_eq!(store.set_vote("nowhere", "k", None), VoteChange::Unchanged);
    assert!(store.group("nowhere").is_none());
}

#[test]
fn changing_an_option_overwrites() {
    let mut store = VoteStore::new();
    store.set_vote("g", "k", Some("x"));
    assert_eq!(store.set_vote("g", "k", Some("y")), VoteChange::Recorded);
    assert_eq!(store.get("g", "k"), Some("y"));
    assert_eq!(store.group("g").map(|g| g.len()), Some(1));
}

#[test]
fn clear_key_everywhere_counts_removed_records() {
    let mut store = VoteStore::new();
    store.set_vote("g1", "k", Some("a"));
    store.set_vote("g2", "k", Some("b"));
    store.set_vote("g2", "other", Some("b"));

    assert_eq!(store.clear_key_everywhere("k"), 2);
    assert_eq!(store.clear_key_everywhere("k"), 0);
    assert!(!store.clear_key("g2", "k"));
    assert!(store.clear_key("g2", "other"));
    assert_eq!(store.num_groups(), 2);
}

// -----------------------------------------------------------------------------
// Registry
// -----------------------------------------------------------------------------

#[test]
fn registry_ignores_unknown_ids() {
    let mut registry = ConnectionRegistry::new();
    assert!(registry.on_connect(A));
    assert!(!registry.on_connect(A));
    assert_eq!(registry.count(), 1);

    assert!(registry.on_disconnect(B).is_none());
    assert!(!registry.set_color(B, Some("red".to_string())));
    assert_eq!(registry.count(), 1);

    assert!(registry.on_disconnect(A).is_some());
    assert!(registry.on_disconnect(A).is_none());
    assert_eq!(registry.count(), 0);
}

#[test]
fn revoke_color_spares_the_claimant() {
    let mut registry = ConnectionRegistry::new();
    registry.on_connect(A);
    registry.on_connect(B);
    registry.set_color(A, Some("red".to_string()));
    registry.set_color(B, Some("red".to_string()));

    assert_eq!(registry.revoke_color("red", B), vec![A]);
    assert_eq!(registry.color_of(A), None);
    assert_eq!(registry.color_of(B), Some("red"));
    assert_eq!(registry.holders_of("red"), vec![B]);
}

// -----------------------------------------------------------------------------
// Identity mode
// -----------------------------------------------------------------------------

#[test]
fn policies_report_revocations_and_removed_votes() {
    let mut registry = ConnectionRegistry::new();
    registry.on_connect(A);
    registry.on_connect(B);

    let color = ColorScoped;
    assert!(color.claim_color(&mut registry, A, Some("red".to_string())).is_empty());
    assert_eq!(color.claim_color(&mut registry, B, Some("red".to_string())), vec![A]);
    assert!(color.claim_color(&mut registry, B, None).is_empty());

    let mut votes = VoteStore::new();
    votes.set_vote("g1", "1", Some("yes"));
    votes.set_vote("g2", "1", Some("no"));
    votes.set_vote("g1", "red", Some("no"));

    assert_eq!(color.on_disconnect(&mut votes, A), 0);
    assert_eq!(ConnectionScoped.on_disconnect(&mut votes, A), 2);
    assert_eq!(ConnectionScoped.on_disconnect(&mut votes, A), 0);
    assert_eq!(votes.get("g1", "red"), Some("no"));
}

#[test]
fn identity_mode_parses_config_strings() {
    assert_eq!("color".parse::<IdentityMode>(), Ok(IdentityMode::Color));
    assert_eq!(" Colour ".parse::<IdentityMode>(), Ok(IdentityMode::Color));
    assert_eq!("CONNECTION".parse::<IdentityMode>(), Ok(IdentityMode::Connection));
    assert_eq!("session".parse::<IdentityMode>(), Ok(IdentityMode::Connection));
    assert_eq!(
        "seat".parse::<IdentityMode>(),
        Err(CoreError::UnknownIdentityMode("seat".to_string()))
    );
    assert_eq!(IdentityMode::default(), IdentityMode::Color);
    assert_eq!(IdentityMode::Connection.to_string(), "connection");
}

// -----------------------------------------------------------------------------
// Coordinator: color identity
// -----------------------------------------------------------------------------

#[test]
fn claim_then_vote_is_keyed_by_color() {
    let mut c = connected(IdentityMode::Color, &[A]);
    c.process_message(A, set_color("red"));
    let out = c.process_message(A, vote("g1", Some("yes")));

    assert_eq!(c.votes().get("g1", "red"), Some("yes"));
    assert_eq!(c.votes().num_groups(), 1);

    assert_eq!(out.len(), 1);
    match &out[0] {
        OutputMessage::VoteUpdate(update) => {
            assert_eq!(update.key, "red");
            assert_eq!(update.color.as_deref(), Some("red"));
            assert_eq!(update.option.as_deref(), Some("yes"));
            assert_eq!(&update.all_votes, c.votes().get_all());
            assert_eq!(update.users, c.users_snapshot());
        }
        other => panic!("expected vote-update, got {:?}", other),
    }
    assert_eq!(out[0].audience(), Audience::All);
}

#[test]
fn taking_a_color_revokes_it_but_keeps_its_votes() {
    let mut c = connected(IdentityMode::Color, &[A, B]);
    c.process_message(A, set_color("red"));
    c.process_message(A, vote("g1", Some("yes")));

    let out = c.process_message(B, set_color("red"));

    assert_eq!(c.registry().color_of(A), None);
    assert_eq!(c.registry().color_of(B), Some("red"));
    assert_eq!(c.votes().get("g1", "red"), Some("yes"));

    assert_eq!(out.len(), 2);
    match &out[0] {
        OutputMessage::UsersUpdate(users) => {
            assert_eq!(users.get(&A), Some(&None));
            assert_eq!(users.get(&B), Some(&Some("red".to_string())));
        }
        other => panic!("expected users-update, got {:?}", other),
    }
    match &out[1] {
        OutputMessage::SyncVotes(votes) => assert_eq!(votes, c.votes().get_all()),
        other => panic!("expected sync-votes, got {:?}", other),
    }
    assert_eq!(out[1].audience(), Audience::Origin);
}

#[test]
fn colorless_vote_is_silently_ignored() {
    let mut c = connected(IdentityMode::Color, &[A]);
    let before = c.votes().clone();

    let out = c.process_message(A, vote("g1", Some("yes")));

    assert!(out.is_empty());
    assert_eq!(c.votes(), &before);
}

#[test]
fn empty_group_name_is_accepted() {
    let mut c = connected(IdentityMode::Color, &[A]);
    c.process_message(A, set_color("red"));

    let out = c.process_message(A, vote("", Some("yes")));

    assert_eq!(c.votes().get("", "red"), Some("yes"));
    assert_eq!(out.len(), 1);
    assert!(matches!(&out[0], OutputMessage::VoteUpdate(update) if update.group.is_empty()));
}

#[test]
fn color_disconnect_preserves_votes_for_the_next_claimant() {
    let mut c = connected(IdentityMode::Color, &[A]);
    c.process_message(A, set_color("red"));
    c.process_message(A, vote("g1", Some("yes")));
    c.process_message(A, vote("g2", Some("no")));

    let out = c.process_message(A, InputMessage::Disconnect);
    assert_eq!(out[0], OutputMessage::UserCount(0));
    assert_eq!(c.votes().get("g1", "red"), Some("yes"));
    assert_eq!(c.votes().get("g2", "red"), Some("no"));

    // Someone picks the red card back up and changes one answer.
    c.process_message(B, InputMessage::Connect);
    c.process_message(B, set_color("red"));
    c.process_message(B, vote("g1", Some("maybe")));
    assert_eq!(c.votes().get("g1", "red"), Some("maybe"));
    assert_eq!(c.votes().get("g2", "red"), Some("no"));
}

#[test]
fn empty_claim_drops_the_color() {
    let mut c = connected(IdentityMode::Color, &[A]);
    c.process_message(A, set_color("red"));
    c.process_message(A, set_color(""));

    assert_eq!(c.registry().color_of(A), None);
    assert!(c.process_message(A, vote("g1", Some("yes"))).is_empty());
}

#[test]
fn reclaiming_own_color_changes_nothing() {
    let mut c = connected(IdentityMode::Color, &[A, B]);
    c.process_message(A, set_color("red"));
    c.process_message(B, set_color("blue"));
    c.process_message(A, set_color("red"));

    assert_eq!(c.registry().color_of(A), Some("red"));
    assert_eq!(c.registry().color_of(B), Some("blue"));
}

#[test]
fn colors_stay_exclusive_across_many_claims() {
    let ids: Vec<ConnectionId> = (1..=5).map(ConnectionId).collect();
    let mut c = connected(IdentityMode::Color, &ids);
    let colors = ["red", "blue", "green"];

    for step in 0..40usize {
        let id = ids[(step * 7) % ids.len()];
        let color = colors[(step * 3) % colors.len()];
        c.process_message(id, set_color(color));

        for color in colors {
            assert!(c.registry().holders_of(color).len() <= 1);
        }
    }
}

// -----------------------------------------------------------------------------
// Coordinator: connection identity
// -----------------------------------------------------------------------------

#[test]
fn connection_votes_are_keyed_by_id_and_need_no_color() {
    let mut c = connected(IdentityMode::Connection, &[A]);
    let out = c.process_message(A, vote("g1", Some("yes")));

    assert_eq!(c.votes().get("g1", "1"), Some("yes"));
    match &out[0] {
        OutputMessage::VoteUpdate(update) => {
            assert_eq!(update.key, "1");
            assert_eq!(update.color, None);
        }
        other => panic!("expected vote-update, got {:?}", other),
    }
}

#[test]
fn connection_colors_are_cosmetic_and_shareable() {
    let mut c = connected(IdentityMode::Connection, &[A, B]);
    c.process_message(A, set_color("red"));
    c.process_message(B, set_color("red"));

    assert_eq!(c.registry().color_of(A), Some("red"));
    assert_eq!(c.registry().color_of(B), Some("red"));
}

#[test]
fn connection_disconnect_cleans_every_group() {
    let mut c = connected(IdentityMode::Connection, &[A, B]);
    c.process_message(A, vote("g1", Some("yes")));
    c.process_message(A, vote("g2", Some("no")));
    c.process_message(B, vote("g1", Some("no")));

    let out = c.process_message(A, InputMessage::Disconnect);

    for (_, group) in c.votes().get_all() {
        assert!(!group.contains_key("1"));
    }
    assert_eq!(c.votes().get("g1", "2"), Some("no"));

    // Only the roster goes out; peers re-request the vote table themselves.
    assert_eq!(out.len(), 2);
    assert!(!out.iter().any(|m| matches!(m, OutputMessage::SyncVotes(_))));
    assert_eq!(
        c.process_message(B, InputMessage::RequestVotes),
        vec![OutputMessage::SyncVotes(c.votes().get_all().clone())]
    );
}

// -----------------------------------------------------------------------------
// Coordinator: lifecycle
// -----------------------------------------------------------------------------

#[test]
fn connect_and_disconnect_broadcast_count_and_users() {
    let mut c = VoteCoordinator::new(IdentityMode::Color);

    let out = c.process_message(A, InputMessage::Connect);
    assert_eq!(out[0], OutputMessage::UserCount(1));
    assert!(matches!(&out[1], OutputMessage::UsersUpdate(users) if users.len() == 1));
    assert!(out.iter().all(|m| m.audience() == Audience::All));

    c.process_message(B, InputMessage::Connect);
    let out = c.process_message(A, InputMessage::Disconnect);
    assert_eq!(out[0], OutputMessage::UserCount(1));
    assert!(matches!(&out[1], OutputMessage::UsersUpdate(users) if users.contains_key(&B)));
}

#[test]
fn unknown_connections_produce_nothing() {
    let mut c = VoteCoordinator::new(IdentityMode::Connection);

    assert!(c.process_message(A, InputMessage::Disconnect).is_empty());
    assert!(c.process_message(A, set_color("red")).is_empty());
    assert!(c.process_message(A, InputMessage::RequestVotes).is_empty());
    assert!(c.process_message(A, vote("g1", Some("yes"))).is_empty());
    assert_eq!(c.votes().num_groups(), 0);

    c.process_message(A, InputMessage::Connect);
    assert!(c.process_message(A, InputMessage::Connect).is_empty());
    assert_eq!(c.count(), 1);
}

#[test]
fn request_votes_is_unicast() {
    let mut c = connected(IdentityMode::Color, &[A]);
    let out = c.process_message(A, InputMessage::RequestVotes);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].audience(), Audience::Origin);
    assert!(matches!(&out[0], OutputMessage::SyncVotes(votes) if votes.is_empty()));
}
