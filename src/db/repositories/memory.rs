//! Process-local store backed by `DashMap`s.
//!
//! Every mutation of one aggregate happens while holding that entry's
//! write guard, which gives the same atomicity as the row-locking
//! PostgreSQL queries.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::db::enums::CardColumn;
use crate::db::models::action_item::{ActionItem, ActionItemChanges, ActionItemFilter, NewActionItem};
use crate::db::models::auth::{NewUser, User};
use crate::db::models::card::{Card, NewCard};
use crate::db::models::retro::{NewRetro, Retro, RetroFilter};
use crate::db::models::team::{MemberRemovalError, NewTeamMember, Team};
use crate::db::repositories::{
    ActionItemRepository, CardRepository, MemberRemoval, RetroRepository, Store, TeamRepository,
    UserRepository,
};
use crate::db::{StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    user_emails: DashMap<String, Uuid>,
    teams: DashMap<Uuid, Team>,
    retros: DashMap<Uuid, Retro>,
    cards: DashMap<Uuid, Card>,
    action_items: DashMap<Uuid, ActionItem>,
    last_tick: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strictly increasing timestamps so "newest first" is a total order.
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_micros();
        let mut prev = self.last_tick.load(Ordering::Relaxed);
        loop {
            let next = wall.max(prev + 1);
            match self.last_tick.compare_exchange_weak(
                prev,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return DateTime::from_timestamp_micros(next).unwrap_or_else(Utc::now),
                Err(actual) => prev = actual,
            }
        }
    }
}

impl UserRepository for MemoryStore {
    fn find_user_by_id(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.get(&user_id).map(|u| u.clone()))
    }

    fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let Some(user_id) = self.user_emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        self.find_user_by_id(user_id)
    }

    fn insert_user(&self, new_user: &NewUser) -> StoreResult<User> {
        match self.user_emails.entry(new_user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate("users_email_key".to_string())),
            Entry::Vacant(slot) => {
                let now = self.now();
                let user = User {
                    id: Uuid::new_v4(),
                    email: new_user.email.clone(),
                    name: new_user.name.clone(),
                    password_hash: new_user.password_hash.clone(),
                    created_at: now,
                    updated_at: now,
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }
}

impl TeamRepository for MemoryStore {
    fn insert_team(&self, name: &str, owner: &NewTeamMember) -> StoreResult<Team> {
        let now = self.now();
        let team = Team {
            id: Uuid::new_v4(),
            name: name.to_string(),
            members: vec![owner.clone().into_member(Uuid::new_v4(), now)],
            created_at: now,
            updated_at: now,
        };
        self.teams.insert(team.id, team.clone());
        Ok(team)
    }

    fn find_team(&self, team_id: Uuid) -> StoreResult<Option<Team>> {
        Ok(self.teams.get(&team_id).map(|t| t.clone()))
    }

    fn rename_team(&self, team_id: Uuid, name: &str) -> StoreResult<Option<Team>> {
        let now = self.now();
        Ok(self.teams.get_mut(&team_id).map(|mut team| {
            team.name = name.to_string();
            team.updated_at = now;
            team.clone()
        }))
    }

    fn teams_for_user(&self, user_id: Uuid, email: &str) -> StoreResult<Vec<Team>> {
        let mut list: Vec<Team> = self
            .teams
            .iter()
            .filter(|t| t.is_member(user_id, Some(email)))
            .map(|t| t.clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    fn push_member(&self, team_id: Uuid, member: &NewTeamMember) -> StoreResult<Option<Team>> {
        let now = self.now();
        let Some(mut team) = self.teams.get_mut(&team_id) else {
            return Ok(None);
        };
        if team.has_member_email(&member.invited_email) {
            return Err(StoreError::Duplicate(
                "team_members_team_email_key".to_string(),
            ));
        }
        team.members.push(member.clone().into_member(Uuid::new_v4(), now));
        team.updated_at = now;
        Ok(Some(team.clone()))
    }

    fn remove_member(&self, team_id: Uuid, member_id: Uuid) -> StoreResult<MemberRemoval> {
        let now = self.now();
        let Some(mut team) = self.teams.get_mut(&team_id) else {
            return Ok(MemberRemoval::TeamNotFound);
        };
        match team.check_removal(member_id) {
            Err(MemberRemovalError::MemberNotFound) => Ok(MemberRemoval::MemberNotFound),
            Err(MemberRemovalError::LastOwner) => Ok(MemberRemoval::LastOwner),
            Ok(()) => {
                team.members.retain(|m| m.id != member_id);
                team.updated_at = now;
                Ok(MemberRemoval::Removed(team.clone()))
            }
        }
    }

    fn link_pending_member(&self, team_id: Uuid, email: &str, user_id: Uuid) -> StoreResult<bool> {
        Ok(self
            .teams
            .get_mut(&team_id)
            .is_some_and(|mut team| team.link_pending(email, user_id)))
    }

    fn link_pending_memberships(&self, email: &str, user_id: Uuid) -> StoreResult<usize> {
        let mut linked = 0;
        for mut team in self.teams.iter_mut() {
            if team.link_pending(email, user_id) {
                linked += 1;
            }
        }
        Ok(linked)
    }
}

impl RetroRepository for MemoryStore {
    fn insert_retro(&self, new_retro: &NewRetro) -> StoreResult<Retro> {
        let now = self.now();
        let retro = Retro {
            id: Uuid::new_v4(),
            team_id: new_retro.team_id,
            name: new_retro.name.clone(),
            sprint_label: new_retro.sprint_label.clone(),
            start_date: new_retro.start_date,
            end_date: new_retro.end_date,
            created_by: new_retro.created_by,
            created_at: now,
            updated_at: now,
        };
        self.retros.insert(retro.id, retro.clone());
        Ok(retro)
    }

    fn find_retro(&self, retro_id: Uuid) -> StoreResult<Option<Retro>> {
        Ok(self.retros.get(&retro_id).map(|r| r.clone()))
    }

    fn list_retros(&self, team_id: Uuid, filter: &RetroFilter) -> StoreResult<Vec<Retro>> {
        let mut list: Vec<Retro> = self
            .retros
            .iter()
            .filter(|r| r.team_id == team_id && filter.matches(r))
            .map(|r| r.clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }
}

impl CardRepository for MemoryStore {
    fn insert_card(&self, new_card: &NewCard) -> StoreResult<Card> {
        let now = self.now();
        let card = Card {
            id: Uuid::new_v4(),
            retro_id: new_card.retro_id,
            author_id: new_card.author_id,
            content: new_card.content.clone(),
            column: new_card.column,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.cards.insert(card.id, card.clone());
        Ok(card)
    }

    fn find_card(&self, card_id: Uuid) -> StoreResult<Option<Card>> {
        Ok(self.cards.get(&card_id).map(|c| c.clone()))
    }

    fn list_cards(&self, retro_id: Uuid, include_deleted: bool) -> StoreResult<Vec<Card>> {
        let mut list: Vec<Card> = self
            .cards
            .iter()
            .filter(|c| c.retro_id == retro_id && (include_deleted || !c.is_deleted))
            .map(|c| c.clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    fn update_card_content(&self, card_id: Uuid, content: &str) -> StoreResult<Option<Card>> {
        let now = self.now();
        Ok(self.cards.get_mut(&card_id).map(|mut card| {
            card.content = content.to_string();
            card.updated_at = now;
            card.clone()
        }))
    }

    fn soft_delete_card(&self, card_id: Uuid) -> StoreResult<Option<Card>> {
        let now = self.now();
        Ok(self.cards.get_mut(&card_id).map(|mut card| {
            if !card.is_deleted {
                card.is_deleted = true;
                card.deleted_at = Some(now);
                card.updated_at = now;
            }
            card.clone()
        }))
    }

    fn count_source_cards(&self, retro_id: Uuid, card_ids: &[Uuid]) -> StoreResult<usize> {
        let mut seen = Vec::with_capacity(card_ids.len());
        for id in card_ids {
            if seen.contains(id) {
                continue;
            }
            seen.push(*id);
        }
        Ok(seen
            .iter()
            .filter(|id| {
                self.cards.get(*id).is_some_and(|c| {
                    c.retro_id == retro_id
                        && c.column == CardColumn::NeedsImprovement
                        && !c.is_deleted
                })
            })
            .count())
    }
}

impl ActionItemRepository for MemoryStore {
    fn insert_action_item(&self, new_item: &NewActionItem) -> StoreResult<ActionItem> {
        let now = self.now();
        let item = ActionItem {
            id: Uuid::new_v4(),
            team_id: new_item.team_id,
            retro_id: new_item.retro_id,
            title: new_item.title.clone(),
            description: new_item.description.clone(),
            status: new_item.status,
            source_card_ids: new_item.source_card_ids.clone(),
            assigned_to: new_item.assigned_to,
            created_by: new_item.created_by,
            created_at: now,
            updated_at: now,
        };
        self.action_items.insert(item.id, item.clone());
        Ok(item)
    }

    fn find_action_item(&self, item_id: Uuid) -> StoreResult<Option<ActionItem>> {
        Ok(self.action_items.get(&item_id).map(|i| i.clone()))
    }

    fn list_action_items(
        &self,
        team_id: Uuid,
        filter: &ActionItemFilter,
    ) -> StoreResult<Vec<ActionItem>> {
        let mut list: Vec<ActionItem> = self
            .action_items
            .iter()
            .filter(|i| i.team_id == team_id && filter.matches(i))
            .map(|i| i.clone())
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    fn update_action_item(
        &self,
        item_id: Uuid,
        changes: &ActionItemChanges,
    ) -> StoreResult<Option<ActionItem>> {
        Ok(self.action_items.get_mut(&item_id).map(|mut item| {
            changes.apply_to(&mut item);
            item.clone()
        }))
    }
}

impl Store for MemoryStore {
    fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
