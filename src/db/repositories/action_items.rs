use diesel::prelude::*;
use uuid::Uuid;

use crate::db::StoreResult;
use crate::db::models::action_item::{ActionItem, ActionItemChanges, ActionItemFilter, NewActionItem};
use crate::db::repositories::{ActionItemRepository, PgStore, contains_pattern};

impl ActionItemRepository for PgStore {
    fn insert_action_item(&self, new_item: &NewActionItem) -> StoreResult<ActionItem> {
        let mut conn = self.conn()?;
        let item = diesel::insert_into(crate::schema::action_items::table)
            .values(new_item)
            .returning(ActionItem::as_returning())
            .get_result(&mut conn)?;
        Ok(item)
    }

    fn find_action_item(&self, item_id: Uuid) -> StoreResult<Option<ActionItem>> {
        use crate::schema::action_items::dsl::*;
        let mut conn = self.conn()?;
        let item = action_items
            .filter(id.eq(item_id))
            .select(ActionItem::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(item)
    }

    fn list_action_items(
        &self,
        target_team_id: Uuid,
        filter: &ActionItemFilter,
    ) -> StoreResult<Vec<ActionItem>> {
        use crate::schema::action_items::dsl::*;
        let mut conn = self.conn()?;

        let mut query = action_items
            .filter(team_id.eq(target_team_id))
            .into_boxed();
        if let Some(target_status) = filter.status {
            query = query.filter(status.eq(target_status));
        }
        if let Some(target_retro) = filter.retro_id {
            query = query.filter(retro_id.eq(target_retro));
        }
        if let Some(term) = filter.search_term() {
            let pattern = contains_pattern(&term);
            query = query.filter(title.ilike(pattern.clone()).or(description.ilike(pattern)));
        }

        let list = query
            .order(created_at.desc())
            .select(ActionItem::as_select())
            .load(&mut conn)?;
        Ok(list)
    }

    fn update_action_item(
        &self,
        item_id: Uuid,
        changes: &ActionItemChanges,
    ) -> StoreResult<Option<ActionItem>> {
        use crate::schema::action_items::dsl::*;
        let mut conn = self.conn()?;
        let item = diesel::update(action_items.filter(id.eq(item_id)))
            .set(changes)
            .returning(ActionItem::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(item)
    }
}
