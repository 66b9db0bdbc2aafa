use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::enums::MemberRole;
use crate::db::models::auth::normalize_email;

// Team Member models
#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::team_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamMember {
    pub id: Uuid,
    /// `None` while the invitation is pending.
    pub user_id: Option<Uuid>,
    pub role: MemberRole,
    pub invited_email: String,
    pub joined_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn is_pending(&self) -> bool {
        self.user_id.is_none()
    }

    fn email_matches(&self, normalized_email: &str) -> bool {
        self.invited_email == normalized_email
    }
}

/// Member entry to append to a team. The email is stored lowercased.
#[derive(Clone, Debug)]
pub struct NewTeamMember {
    pub user_id: Option<Uuid>,
    pub role: MemberRole,
    pub invited_email: String,
}

impl NewTeamMember {
    pub fn owner(user_id: Uuid, email: &str) -> Self {
        Self {
            user_id: Some(user_id),
            role: MemberRole::Owner,
            invited_email: normalize_email(email),
        }
    }

    pub fn invited(email: &str, role: MemberRole, user_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            role,
            invited_email: normalize_email(email),
        }
    }

    pub fn into_member(self, id: Uuid, joined_at: DateTime<Utc>) -> TeamMember {
        TeamMember {
            id,
            user_id: self.user_id,
            role: self.role,
            invited_email: self.invited_email,
            joined_at,
        }
    }
}

// Team models
#[derive(Queryable, Selectable, Clone, Debug)]
#[diesel(table_name = crate::schema::teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamRow {
    pub fn with_members(self, members: Vec<TeamMember>) -> Team {
        Team {
            id: self.id,
            name: self.name,
            members,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::teams)]
pub struct NewTeam {
    pub name: String,
}

/// A team together with its ordered member list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<TeamMember>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRemovalError {
    MemberNotFound,
    LastOwner,
}

impl Team {
    /// Membership matches on the bound user id, or on the invited email when one is given.
    pub fn is_member(&self, user_id: Uuid, user_email: Option<&str>) -> bool {
        let email = user_email.map(normalize_email);
        self.members.iter().any(|m| {
            m.user_id == Some(user_id)
                || email.as_deref().is_some_and(|e| m.email_matches(e))
        })
    }

    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.role_of(user_id) == Some(MemberRole::Owner)
    }

    pub fn role_of(&self, user_id: Uuid) -> Option<MemberRole> {
        self.members
            .iter()
            .find(|m| m.user_id == Some(user_id))
            .map(|m| m.role)
    }

    pub fn owner_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.role == MemberRole::Owner)
            .count()
    }

    pub fn member(&self, member_id: Uuid) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn has_member_email(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.members.iter().any(|m| m.email_matches(&email))
    }

    pub fn pending_member_for(&self, email: &str) -> Option<&TeamMember> {
        let email = normalize_email(email);
        self.members
            .iter()
            .find(|m| m.is_pending() && m.email_matches(&email))
    }

    /// The sole owner can never be removed.
    pub fn check_removal(&self, member_id: Uuid) -> Result<(), MemberRemovalError> {
        let member = self
            .member(member_id)
            .ok_or(MemberRemovalError::MemberNotFound)?;
        if member.role == MemberRole::Owner && self.owner_count() <= 1 {
            return Err(MemberRemovalError::LastOwner);
        }
        Ok(())
    }

    /// Binds the pending entry for `email` to `user_id`. Returns false when
    /// there is nothing to link, which makes repeated calls no-ops.
    pub fn link_pending(&mut self, email: &str, user_id: Uuid) -> bool {
        let email = normalize_email(email);
        match self
            .members
            .iter_mut()
            .find(|m| m.is_pending() && m.email_matches(&email))
        {
            Some(member) => {
                member.user_id = Some(user_id);
                true
            }
            None => false,
        }
    }
}

// Team API DTOs
#[derive(Deserialize, validator::Validate)]
pub struct CreateTeamRequest {
    #[validate(length(max = 255, message = "Team name is too long (max 255 characters)"))]
    pub name: String,
}

#[derive(Deserialize, validator::Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(max = 255, message = "Team name is too long (max 255 characters)"))]
    pub name: String,
}

#[derive(Deserialize, validator::Validate)]
pub struct InviteMemberRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: Option<Uuid>, role: MemberRole, email: &str) -> TeamMember {
        NewTeamMember::invited(email, role, user_id).into_member(Uuid::new_v4(), Utc::now())
    }

    fn team(members: Vec<TeamMember>) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: "Platform".into(),
            members,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn is_member_matches_user_or_email() {
        let alice = Uuid::new_v4();
        let t = team(vec![
            member(Some(alice), MemberRole::Owner, "alice@x.com"),
            member(None, MemberRole::Member, "bob@x.com"),
        ]);
        let bob = Uuid::new_v4();

        assert!(t.is_member(alice, None));
        assert!(!t.is_member(bob, None));
        assert!(t.is_member(bob, Some("Bob@X.com")));
        assert!(!t.is_member(bob, Some("carol@x.com")));
    }

    #[test]
    fn is_owner_requires_bound_owner_entry() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let t = team(vec![
            member(Some(alice), MemberRole::Owner, "alice@x.com"),
            member(Some(bob), MemberRole::Member, "bob@x.com"),
            member(None, MemberRole::Owner, "carol@x.com"),
        ]);
        assert!(t.is_owner(alice));
        assert!(!t.is_owner(bob));
        assert_eq!(t.role_of(bob), Some(MemberRole::Member));
        assert_eq!(t.owner_count(), 2);
    }

    #[test]
    fn check_removal_guards_last_owner() {
        let alice = Uuid::new_v4();
        let owner = member(Some(alice), MemberRole::Owner, "alice@x.com");
        let regular = member(None, MemberRole::Member, "bob@x.com");
        let t = team(vec![owner.clone(), regular.clone()]);

        assert_eq!(t.check_removal(owner.id), Err(MemberRemovalError::LastOwner));
        assert_eq!(t.check_removal(regular.id), Ok(()));
        assert_eq!(
            t.check_removal(Uuid::new_v4()),
            Err(MemberRemovalError::MemberNotFound)
        );
    }

    #[test]
    fn second_owner_can_be_removed() {
        let a = member(Some(Uuid::new_v4()), MemberRole::Owner, "a@x.com");
        let b = member(Some(Uuid::new_v4()), MemberRole::Owner, "b@x.com");
        let t = team(vec![a.clone(), b]);
        assert_eq!(t.check_removal(a.id), Ok(()));
    }

    #[test]
    fn link_pending_binds_once() {
        let bob = Uuid::new_v4();
        let mut t = team(vec![
            member(Some(Uuid::new_v4()), MemberRole::Owner, "alice@x.com"),
            member(None, MemberRole::Member, "bob@x.com"),
        ]);
        assert!(t.pending_member_for("BOB@x.com").is_some());

        assert!(t.link_pending("BOB@x.com", bob));
        assert!(!t.link_pending("bob@x.com", bob));
        assert_eq!(t.members.len(), 2);
        assert_eq!(t.members[1].user_id, Some(bob));
        assert!(t.pending_member_for("bob@x.com").is_none());
    }

    #[test]
    fn has_member_email_is_case_insensitive() {
        let t = team(vec![member(None, MemberRole::Member, "Bob@X.com")]);
        assert_eq!(t.members[0].invited_email, "bob@x.com");
        assert!(t.has_member_email(" BOB@x.COM"));
    }
}
