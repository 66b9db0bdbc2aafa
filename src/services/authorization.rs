//! Per-request guards. Each one resolves the target resource chain and
//! checks membership before any store mutation runs.

use uuid::Uuid;

use crate::db::models::{ActionItem, Card, Retro, Team};
use crate::db::repositories::{ActionItemRepository, RetroRepository, TeamRepository};
use crate::error::{AppError, AppResult};
use crate::services::context::RequestContext;
use crate::services::team_members_service::TeamMembersService;

/// A resource with a single owning identity.
pub trait ResourceOwner {
    fn owner_id(&self) -> Uuid;
}

impl ResourceOwner for Card {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl ResourceOwner for ActionItem {
    fn owner_id(&self) -> Uuid {
        self.created_by
    }
}

pub fn require_resource_owner<R: ResourceOwner>(
    resource: &R,
    ctx: &RequestContext,
    message: &str,
) -> AppResult<()> {
    if resource.owner_id() != ctx.user_id {
        return Err(AppError::forbidden(message));
    }
    Ok(())
}

fn check_membership<S>(store: &S, ctx: &RequestContext, mut team: Team) -> AppResult<Team>
where
    S: TeamRepository + ?Sized,
{
    if !team.is_member(ctx.user_id, Some(&ctx.email)) {
        return Err(AppError::forbidden(
            "Access denied. You are not a member of this team",
        ));
    }
    TeamMembersService::resolve_auto_link(store, &mut team, ctx)?;
    Ok(team)
}

fn load_team<S>(store: &S, team_id: Uuid) -> AppResult<Team>
where
    S: TeamRepository + ?Sized,
{
    store
        .find_team(team_id)?
        .ok_or_else(|| AppError::not_found("Team"))
}

pub fn require_team_member<S>(
    store: &S,
    ctx: &RequestContext,
    team_id: Option<Uuid>,
) -> AppResult<Team>
where
    S: TeamRepository + ?Sized,
{
    let team_id = team_id.ok_or_else(|| AppError::bad_request("Team ID is required"))?;
    let team = load_team(store, team_id)?;
    check_membership(store, ctx, team)
}

pub fn require_team_owner<S>(
    store: &S,
    ctx: &RequestContext,
    team_id: Option<Uuid>,
) -> AppResult<Team>
where
    S: TeamRepository + ?Sized,
{
    let team = require_team_member(store, ctx, team_id)?;
    if !team.is_owner(ctx.user_id) {
        return Err(AppError::forbidden(
            "Access denied. Only team owners can perform this action",
        ));
    }
    Ok(team)
}

pub fn require_retro_member<S>(
    store: &S,
    ctx: &RequestContext,
    retro_id: Option<Uuid>,
) -> AppResult<(Retro, Team)>
where
    S: TeamRepository + RetroRepository + ?Sized,
{
    let retro_id = retro_id.ok_or_else(|| AppError::bad_request("Retro ID is required"))?;
    let retro = store
        .find_retro(retro_id)?
        .ok_or_else(|| AppError::not_found("Retro"))?;
    let team = load_team(store, retro.team_id)?;
    let team = check_membership(store, ctx, team)?;
    Ok((retro, team))
}

pub fn require_action_item_member<S>(
    store: &S,
    ctx: &RequestContext,
    item_id: Option<Uuid>,
) -> AppResult<(ActionItem, Team)>
where
    S: TeamRepository + ActionItemRepository + ?Sized,
{
    let item_id = item_id.ok_or_else(|| AppError::bad_request("Action item ID is required"))?;
    let item = store
        .find_action_item(item_id)?
        .ok_or_else(|| AppError::not_found("Action item"))?;
    let team = load_team(store, item.team_id)?;
    let team = check_membership(store, ctx, team)?;
    Ok((item, team))
}
