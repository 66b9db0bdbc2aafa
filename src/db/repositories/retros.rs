use diesel::prelude::*;
use uuid::Uuid;

use crate::db::StoreResult;
use crate::db::models::retro::{NewRetro, Retro, RetroFilter};
use crate::db::repositories::{PgStore, RetroRepository, contains_pattern};

impl RetroRepository for PgStore {
    fn insert_retro(&self, new_retro: &NewRetro) -> StoreResult<Retro> {
        let mut conn = self.conn()?;
        let retro = diesel::insert_into(crate::schema::retros::table)
            .values(new_retro)
            .returning(Retro::as_returning())
            .get_result(&mut conn)?;
        Ok(retro)
    }

    fn find_retro(&self, retro_id: Uuid) -> StoreResult<Option<Retro>> {
        use crate::schema::retros::dsl::*;
        let mut conn = self.conn()?;
        let retro = retros
            .filter(id.eq(retro_id))
            .select(Retro::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(retro)
    }

    fn list_retros(&self, target_team_id: Uuid, filter: &RetroFilter) -> StoreResult<Vec<Retro>> {
        use crate::schema::retros::dsl::*;
        let mut conn = self.conn()?;

        let mut query = retros.filter(team_id.eq(target_team_id)).into_boxed();
        if let Some(term) = filter.search_term() {
            query = query.filter(name.ilike(contains_pattern(&term)));
        }
        if let Some(from) = filter.created_from {
            query = query.filter(created_at.ge(from));
        }
        if let Some(to) = filter.created_to {
            query = query.filter(created_at.le(to));
        }

        let list = query
            .order(created_at.desc())
            .select(Retro::as_select())
            .load(&mut conn)?;
        Ok(list)
    }
}
