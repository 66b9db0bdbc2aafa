use crate::{
    db::models::team::{NewTeamMember, Team},
    db::repositories::TeamRepository,
    error::{AppError, AppResult},
    services::context::RequestContext,
    validation::team::validate_team_name,
};

pub struct TeamsService;

impl TeamsService {
    /// Creates a team with the caller as its sole owner.
    pub fn create<S>(store: &S, ctx: &RequestContext, name: &str) -> AppResult<Team>
    where
        S: TeamRepository + ?Sized,
    {
        let name = validate_team_name(name)?;
        let owner = NewTeamMember::owner(ctx.user_id, &ctx.email);
        let team = store.insert_team(&name, &owner)?;
        tracing::info!(team_id = %team.id, user_id = %ctx.user_id, "Team created");
        Ok(team)
    }

    /// Teams the caller belongs to, newest first. Pending invitations for
    /// the caller's email are linked before listing.
    pub fn list_for_user<S>(store: &S, ctx: &RequestContext) -> AppResult<Vec<Team>>
    where
        S: TeamRepository + ?Sized,
    {
        let linked = store.link_pending_memberships(&ctx.email, ctx.user_id)?;
        if linked > 0 {
            tracing::info!(user_id = %ctx.user_id, linked, "Pending invitations auto-linked");
        }
        Ok(store.teams_for_user(ctx.user_id, &ctx.email)?)
    }

    pub fn rename<S>(store: &S, team: &Team, name: &str) -> AppResult<Team>
    where
        S: TeamRepository + ?Sized,
    {
        let name = validate_team_name(name)?;
        store
            .rename_team(team.id, &name)?
            .ok_or_else(|| AppError::not_found("Team"))
    }
}
