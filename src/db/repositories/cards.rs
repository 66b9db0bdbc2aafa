use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::StoreResult;
use crate::db::enums::CardColumn;
use crate::db::models::card::{Card, NewCard};
use crate::db::repositories::{CardRepository, PgStore};

impl CardRepository for PgStore {
    fn insert_card(&self, new_card: &NewCard) -> StoreResult<Card> {
        let mut conn = self.conn()?;
        let card = diesel::insert_into(crate::schema::cards::table)
            .values(new_card)
            .returning(Card::as_returning())
            .get_result(&mut conn)?;
        Ok(card)
    }

    fn find_card(&self, card_id: Uuid) -> StoreResult<Option<Card>> {
        use crate::schema::cards::dsl::*;
        let mut conn = self.conn()?;
        let card = cards
            .filter(id.eq(card_id))
            .select(Card::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(card)
    }

    fn list_cards(&self, target_retro_id: Uuid, include_deleted: bool) -> StoreResult<Vec<Card>> {
        use crate::schema::cards::dsl::*;
        let mut conn = self.conn()?;

        let mut query = cards.filter(retro_id.eq(target_retro_id)).into_boxed();
        if !include_deleted {
            query = query.filter(is_deleted.eq(false));
        }

        let list = query
            .order(created_at.desc())
            .select(Card::as_select())
            .load(&mut conn)?;
        Ok(list)
    }

    fn update_card_content(&self, card_id: Uuid, new_content: &str) -> StoreResult<Option<Card>> {
        use crate::schema::cards::dsl::*;
        let mut conn = self.conn()?;
        let card = diesel::update(cards.filter(id.eq(card_id)))
            .set((content.eq(new_content), updated_at.eq(Utc::now())))
            .returning(Card::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(card)
    }

    fn soft_delete_card(&self, card_id: Uuid) -> StoreResult<Option<Card>> {
        use crate::schema::cards::dsl::*;
        let mut conn = self.conn()?;
        let now = Utc::now();
        // 已删除的卡片不再更新，保留首次删除时间
        diesel::update(cards.filter(id.eq(card_id)).filter(is_deleted.eq(false)))
            .set((
                is_deleted.eq(true),
                deleted_at.eq(Some(now)),
                updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        let card = cards
            .filter(id.eq(card_id))
            .select(Card::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(card)
    }

    fn count_source_cards(&self, target_retro_id: Uuid, card_ids: &[Uuid]) -> StoreResult<usize> {
        use crate::schema::cards::dsl::*;
        let mut conn = self.conn()?;
        let count: i64 = cards
            .filter(id.eq_any(card_ids))
            .filter(retro_id.eq(target_retro_id))
            .filter(card_column.eq(CardColumn::NeedsImprovement))
            .filter(is_deleted.eq(false))
            .count()
            .get_result(&mut conn)?;
        Ok(count as usize)
    }
}
