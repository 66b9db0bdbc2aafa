use uuid::Uuid;

use crate::{
    db::StoreError,
    db::models::api::error_codes,
    db::models::team::{NewTeamMember, Team},
    db::repositories::{MemberRemoval, TeamRepository, UserRepository},
    error::{AppError, AppResult},
    services::context::RequestContext,
    validation::team::{parse_member_role, validate_invite_email},
};

pub struct TeamMembersService;

impl TeamMembersService {
    /// Appends a member for `email`. The entry is bound right away when a
    /// user with that email already exists, otherwise it stays pending.
    pub fn add_member<S>(
        store: &S,
        team_id: Uuid,
        email: &str,
        role: Option<&str>,
    ) -> AppResult<Team>
    where
        S: TeamRepository + UserRepository + ?Sized,
    {
        let email = validate_invite_email(email)?;
        let role = parse_member_role(role)?;
        let existing_user = store.find_user_by_email(&email)?.map(|u| u.id);

        let member = NewTeamMember::invited(&email, role, existing_user);
        let team = match store.push_member(team_id, &member) {
            Ok(Some(team)) => team,
            Ok(None) => return Err(AppError::not_found("Team")),
            Err(StoreError::Duplicate(_)) => {
                return Err(AppError::conflict_with_code(
                    "User is already a member of this team",
                    Some("email".to_string()),
                    error_codes::TEAM_MEMBER_EXISTS,
                ));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            team_id = %team_id,
            role = %role,
            pending = existing_user.is_none(),
            "Team member invited"
        );
        Ok(team)
    }

    pub fn remove_member<S>(store: &S, team_id: Uuid, member_id: Uuid) -> AppResult<Team>
    where
        S: TeamRepository + ?Sized,
    {
        match store.remove_member(team_id, member_id)? {
            MemberRemoval::Removed(team) => {
                tracing::info!(team_id = %team_id, member_id = %member_id, "Team member removed");
                Ok(team)
            }
            MemberRemoval::TeamNotFound => Err(AppError::not_found("Team")),
            MemberRemoval::MemberNotFound => Err(AppError::not_found("Member")),
            MemberRemoval::LastOwner => Err(AppError::invariant(
                "Cannot remove the last owner of the team",
            )),
        }
    }

    /// Binds the caller to their pending invitation on `team`, if any.
    /// Repeated or concurrent calls bind at most once.
    pub fn resolve_auto_link<S>(
        store: &S,
        team: &mut Team,
        ctx: &RequestContext,
    ) -> AppResult<bool>
    where
        S: TeamRepository + ?Sized,
    {
        if team.pending_member_for(&ctx.email).is_none() {
            return Ok(false);
        }

        let linked = store.link_pending_member(team.id, &ctx.email, ctx.user_id)?;
        if linked {
            tracing::info!(team_id = %team.id, user_id = %ctx.user_id, "Pending invitation auto-linked");
            team.link_pending(&ctx.email, ctx.user_id);
        } else if let Some(fresh) = store.find_team(team.id)? {
            // another request linked it first
            *team = fresh;
        }
        Ok(linked)
    }
}
