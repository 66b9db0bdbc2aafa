//! Persistence seams. Services only see these traits; `PgStore` backs them
//! with PostgreSQL and `MemoryStore` with process-local maps.

pub mod action_items;
pub mod auth;
pub mod cards;
pub mod memory;
pub mod retros;
pub mod teams;

use uuid::Uuid;

use crate::db::models::action_item::{ActionItem, ActionItemChanges, ActionItemFilter, NewActionItem};
use crate::db::models::auth::{NewUser, User};
use crate::db::models::card::{Card, NewCard};
use crate::db::models::retro::{NewRetro, Retro, RetroFilter};
use crate::db::models::team::{NewTeamMember, Team};
use crate::db::{DbConn, DbPool, StoreResult};

pub use memory::MemoryStore;

/// Outcome of a guarded member removal. The check and the delete happen
/// as one unit, so two racing removals cannot both pass the owner check.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberRemoval {
    Removed(Team),
    TeamNotFound,
    MemberNotFound,
    LastOwner,
}

pub trait UserRepository: Send + Sync {
    fn find_user_by_id(&self, user_id: Uuid) -> StoreResult<Option<User>>;

    /// `email` must already be normalized.
    fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with `StoreError::Duplicate` when the email is taken.
    fn insert_user(&self, new_user: &NewUser) -> StoreResult<User>;
}

pub trait TeamRepository: Send + Sync {
    /// Creates the team and its bootstrap owner together.
    fn insert_team(&self, name: &str, owner: &NewTeamMember) -> StoreResult<Team>;

    fn find_team(&self, team_id: Uuid) -> StoreResult<Option<Team>>;

    fn rename_team(&self, team_id: Uuid, name: &str) -> StoreResult<Option<Team>>;

    /// Teams where the user is bound or invited by email, newest first.
    fn teams_for_user(&self, user_id: Uuid, email: &str) -> StoreResult<Vec<Team>>;

    /// Appends a member. `Ok(None)` when the team does not exist,
    /// `StoreError::Duplicate` when the email already has an entry.
    fn push_member(&self, team_id: Uuid, member: &NewTeamMember) -> StoreResult<Option<Team>>;

    fn remove_member(&self, team_id: Uuid, member_id: Uuid) -> StoreResult<MemberRemoval>;

    /// Binds the pending entry for `email` on one team. Returns true only
    /// for the call that performed the binding.
    fn link_pending_member(&self, team_id: Uuid, email: &str, user_id: Uuid) -> StoreResult<bool>;

    /// Binds every pending entry for `email` across all teams.
    fn link_pending_memberships(&self, email: &str, user_id: Uuid) -> StoreResult<usize>;
}

pub trait RetroRepository: Send + Sync {
    fn insert_retro(&self, new_retro: &NewRetro) -> StoreResult<Retro>;

    fn find_retro(&self, retro_id: Uuid) -> StoreResult<Option<Retro>>;

    /// Newest first.
    fn list_retros(&self, team_id: Uuid, filter: &RetroFilter) -> StoreResult<Vec<Retro>>;
}

pub trait CardRepository: Send + Sync {
    fn insert_card(&self, new_card: &NewCard) -> StoreResult<Card>;

    fn find_card(&self, card_id: Uuid) -> StoreResult<Option<Card>>;

    fn list_cards(&self, retro_id: Uuid, include_deleted: bool) -> StoreResult<Vec<Card>>;

    fn update_card_content(&self, card_id: Uuid, content: &str) -> StoreResult<Option<Card>>;

    /// Marks the card deleted if it is not already. A repeated call leaves
    /// the first `deleted_at` untouched.
    fn soft_delete_card(&self, card_id: Uuid) -> StoreResult<Option<Card>>;

    /// Counts live "Needs Improvement" cards of `retro_id` among `card_ids`.
    fn count_source_cards(&self, retro_id: Uuid, card_ids: &[Uuid]) -> StoreResult<usize>;
}

pub trait ActionItemRepository: Send + Sync {
    fn insert_action_item(&self, new_item: &NewActionItem) -> StoreResult<ActionItem>;

    fn find_action_item(&self, item_id: Uuid) -> StoreResult<Option<ActionItem>>;

    /// Newest first.
    fn list_action_items(
        &self,
        team_id: Uuid,
        filter: &ActionItemFilter,
    ) -> StoreResult<Vec<ActionItem>>;

    fn update_action_item(
        &self,
        item_id: Uuid,
        changes: &ActionItemChanges,
    ) -> StoreResult<Option<ActionItem>>;
}

pub trait Store:
    UserRepository + TeamRepository + RetroRepository + CardRepository + ActionItemRepository
{
    /// Reachability probe for the health check.
    fn ping(&self) -> StoreResult<()>;
}

/// `ILIKE` pattern matching `term` literally anywhere in the value.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        // 反斜杠是 Postgres LIKE 的默认转义符
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> StoreResult<DbConn> {
        Ok(self.pool.get()?)
    }
}

impl Store for PgStore {
    fn ping(&self) -> StoreResult<()> {
        use diesel::RunQueryDsl;
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ci"), "%ci%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\tmp"), "%c:\\\\tmp%");
    }
}
