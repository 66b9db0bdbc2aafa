use retro_backend::{
    db::enums::MemberRole,
    db::models::team::{Team, TeamMember},
    db::repositories::{MemoryStore, TeamRepository},
    error::AppError,
    services::{TeamMembersService, TeamsService},
};

use super::{register, team_owned_by};

#[test]
fn creator_becomes_sole_owner() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);

    assert_eq!(team.members.len(), 1);
    assert_eq!(team.owner_count(), 1);
    assert!(team.is_owner(ada.user_id));
    assert_eq!(team.members[0].invited_email, "ada@x.com");
}

#[test]
fn blank_team_name_is_rejected() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let result = TeamsService::create(&store, &ada, "   ");
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[test]
fn removing_the_last_owner_is_rejected() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);
    let owner_entry = team.members[0].id;

    let result = TeamMembersService::remove_member(&store, team.id, owner_entry);
    match result {
        Err(AppError::InvariantViolation { message }) => {
            assert_eq!(message, "Cannot remove the last owner of the team");
        }
        other => panic!("expected invariant violation, got {:?}", other.map(|t| t.id)),
    }

    let team = store.find_team(team.id).unwrap().unwrap();
    assert_eq!(team.owner_count(), 1);
}

#[test]
fn owner_can_leave_once_another_owner_exists() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    register(&store, "grace@x.com", "Grace");
    let team = team_owned_by(&store, &ada);

    let team = TeamMembersService::add_member(&store, team.id, "grace@x.com", Some("Owner")).unwrap();
    assert_eq!(team.owner_count(), 2);

    let ada_entry = team.members[0].id;
    let team = TeamMembersService::remove_member(&store, team.id, ada_entry).unwrap();
    assert_eq!(team.members.len(), 1);
    assert_eq!(team.owner_count(), 1);
}

#[test]
fn removing_unknown_member_is_not_found() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);

    let result = TeamMembersService::remove_member(&store, team.id, uuid::Uuid::new_v4());
    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[test]
fn invite_for_unknown_email_stays_pending() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);

    let team = TeamMembersService::add_member(&store, team.id, "Bob@X.com", None).unwrap();
    let bob = member_by_email(&team, "bob@x.com");
    assert!(bob.user_id.is_none());
    assert_eq!(bob.role, MemberRole::Member);
}

#[test]
fn invite_for_registered_email_binds_immediately() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let grace = register(&store, "grace@x.com", "Grace");
    let team = team_owned_by(&store, &ada);

    let team = TeamMembersService::add_member(&store, team.id, "grace@x.com", None).unwrap();
    assert_eq!(member_by_email(&team, "grace@x.com").user_id, Some(grace.user_id));
}

#[test]
fn duplicate_invite_is_a_conflict_regardless_of_case() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);

    TeamMembersService::add_member(&store, team.id, "bob@x.com", None).unwrap();
    let result = TeamMembersService::add_member(&store, team.id, "BOB@x.com", None);
    assert!(matches!(result, Err(AppError::Conflict { .. })));

    let team = store.find_team(team.id).unwrap().unwrap();
    assert_eq!(team.members.len(), 2);
}

#[test]
fn invalid_role_is_rejected() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let team = team_owned_by(&store, &ada);

    let result = TeamMembersService::add_member(&store, team.id, "bob@x.com", Some("Admin"));
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[test]
fn listing_teams_links_pending_invites() {
    let store = MemoryStore::new();
    let ada = register(&store, "ada@x.com", "Ada");
    let first = team_owned_by(&store, &ada);
    let second = TeamsService::create(&store, &ada, "Mobile").unwrap();
    TeamMembersService::add_member(&store, first.id, "bob@x.com", None).unwrap();
    TeamMembersService::add_member(&store, second.id, "bob@x.com", None).unwrap();

    let bob = register(&store, "bob@x.com", "Bob");
    let teams = TeamsService::list_for_user(&store, &bob).unwrap();

    assert_eq!(teams.len(), 2);
    // newest first
    assert_eq!(teams[0].id, second.id);
    for team in &teams {
        assert_eq!(member_by_email(&team, "bob@x.com").user_id, Some(bob.user_id));
        assert_eq!(team.members.len(), 2);
    }
}

fn member_by_email<'a>(team: &'a Team, email: &str) -> &'a TeamMember {
    team.members
        .iter()
        .find(|m| m.invited_email == email)
        .expect("member with email")
}
