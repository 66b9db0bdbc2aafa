use std::sync::Arc;

use retro_backend::{
    db::repositories::{MemoryStore, TeamRepository},
    error::AppError,
    services::TeamMembersService,
    services::authorization::{require_retro_member, require_team_member, require_team_owner},
};

use super::{register, retro_in, team_owned_by};

#[test]
fn pending_invite_is_auto_linked_on_first_access() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    TeamMembersService::add_member(&store, team.id, "bob@x.com", None).unwrap();

    let bob = register(&store, "bob@x.com", "Bob");
    let team = require_team_member(&store, &bob, Some(team.id)).unwrap();

    assert_eq!(team.members.len(), 2);
    let entry = team.members.iter().find(|m| m.invited_email == "bob@x.com").unwrap();
    assert_eq!(entry.user_id, Some(bob.user_id));

    let stored = store.find_team(team.id).unwrap().unwrap();
    assert_eq!(stored, team);
}

#[test]
fn auto_link_is_idempotent() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    TeamMembersService::add_member(&store, team.id, "bob@x.com", None).unwrap();
    let bob = register(&store, "bob@x.com", "Bob");

    let first = require_team_member(&store, &bob, Some(team.id)).unwrap();
    let second = require_team_member(&store, &bob, Some(team.id)).unwrap();

    assert_eq!(first, second);
    assert_eq!(second.members.len(), 2);
}

#[test]
fn non_member_is_forbidden() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let eve = register(&store, "eve@x.com", "Eve");
    let team = team_owned_by(&store, &ada);

    let result = require_team_member(&store, &eve, Some(team.id));
    assert!(matches!(result, Err(AppError::Forbidden { .. })));
}

#[test]
fn missing_team_id_is_bad_request() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let result = require_team_member(&store, &ada, None);
    assert!(matches!(result, Err(AppError::BadRequest { .. })));
}

#[test]
fn unknown_team_is_not_found() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let result = require_team_member(&store, &ada, Some(uuid::Uuid::new_v4()));
    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[test]
fn plain_member_is_not_owner() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let bob = register(&store, "bob@x.com", "Bob");
    let team = team_owned_by(&store, &ada);
    TeamMembersService::add_member(&store, team.id, "bob@x.com", None).unwrap();

    assert!(require_team_owner(&store, &ada, Some(team.id)).is_ok());
    let result = require_team_owner(&store, &bob, Some(team.id));
    assert!(matches!(result, Err(AppError::Forbidden { .. })));
}

#[test]
fn invited_owner_gains_owner_rights_after_link() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    TeamMembersService::add_member(&store, team.id, "carol@x.com", Some("Owner")).unwrap();

    let carol = register(&store, "carol@x.com", "Carol");
    let team = require_team_owner(&store, &carol, Some(team.id)).unwrap();
    assert_eq!(team.owner_count(), 2);
}

#[test]
fn retro_guard_checks_the_owning_team() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let eve = register(&store, "eve@x.com", "Eve");
    let team = team_owned_by(&store, &ada);
    let retro = retro_in(&store, &ada, &team);

    let (found, owning) = require_retro_member(&store, &ada, Some(retro.id)).unwrap();
    assert_eq!(found.id, retro.id);
    assert_eq!(owning.id, team.id);

    let result = require_retro_member(&store, &eve, Some(retro.id));
    assert!(matches!(result, Err(AppError::Forbidden { .. })));
}

#[test]
fn concurrent_first_access_binds_invite_once() {
    let store = Arc::new(MemoryStore::new());
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    TeamMembersService::add_member(store.as_ref(), team.id, "bob@x.com", None).unwrap();
    let bob = register(&store, "bob@x.com", "Bob");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let bob = bob.clone();
            let team_id = team.id;
            std::thread::spawn(move || require_team_member(store.as_ref(), &bob, Some(team_id)))
        })
        .collect();

    for handle in handles {
        let seen = handle.join().unwrap().unwrap();
        assert_eq!(seen.members.len(), 2);
    }

    let stored = store.find_team(team.id).unwrap().unwrap();
    assert_eq!(stored.members.len(), 2);
    let bound: Vec<_> = stored
        .members
        .iter()
        .filter(|m| m.user_id == Some(bob.user_id))
        .collect();
    assert_eq!(bound.len(), 1);
    assert_eq!(bound[0].invited_email, "bob@x.com");
}
