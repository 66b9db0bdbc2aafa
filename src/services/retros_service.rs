use crate::{
    db::models::retro::{CreateRetroRequest, DateRange, NewRetro, Retro, RetroFilter},
    db::models::team::Team,
    db::repositories::RetroRepository,
    error::AppResult,
    services::context::RequestContext,
    validation::{
        non_blank,
        retro::{validate_date_range, validate_retro_name},
    },
};

pub struct RetrosService;

impl RetrosService {
    pub fn create<S>(
        store: &S,
        ctx: &RequestContext,
        team: &Team,
        req: &CreateRetroRequest,
    ) -> AppResult<Retro>
    where
        S: RetroRepository + ?Sized,
    {
        let name = validate_retro_name(&req.name)?;
        let range = DateRange {
            start: req.start_date,
            end: req.end_date,
        };
        validate_date_range(&range)?;

        let new_retro = NewRetro {
            team_id: team.id,
            name,
            sprint_label: non_blank(req.sprint_label.as_deref()),
            start_date: range.start,
            end_date: range.end,
            created_by: ctx.user_id,
        };
        let retro = store.insert_retro(&new_retro)?;
        tracing::info!(retro_id = %retro.id, team_id = %team.id, "Retro created");
        Ok(retro)
    }

    pub fn list<S>(store: &S, team: &Team, filter: &RetroFilter) -> AppResult<Vec<Retro>>
    where
        S: RetroRepository + ?Sized,
    {
        Ok(store.list_retros(team.id, filter)?)
    }
}
