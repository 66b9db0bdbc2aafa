use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::db::enums::ActionItemStatus;

// ActionItem models
#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::action_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActionItem {
    pub id: Uuid,
    pub team_id: Uuid,
    pub retro_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ActionItemStatus,
    /// Traceability only; the referenced cards may change or disappear later.
    pub source_card_ids: Vec<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = crate::schema::action_items)]
pub struct NewActionItem {
    pub team_id: Uuid,
    pub retro_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ActionItemStatus,
    pub source_card_ids: Vec<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
}

/// Partial update. `Some(None)` clears a nullable column.
#[derive(AsChangeset, Clone, Debug, Default)]
#[diesel(table_name = crate::schema::action_items)]
pub struct ActionItemChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<ActionItemStatus>,
    pub assigned_to: Option<Option<Uuid>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ActionItemChanges {
    pub fn apply_to(&self, item: &mut ActionItem) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(assigned_to) = self.assigned_to {
            item.assigned_to = assigned_to;
        }
        if let Some(updated_at) = self.updated_at {
            item.updated_at = updated_at;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActionItemFilter {
    pub status: Option<ActionItemStatus>,
    pub retro_id: Option<Uuid>,
    pub search: Option<String>,
}

impl ActionItemFilter {
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Search covers title and description.
    pub fn matches(&self, item: &ActionItem) -> bool {
        if self.status.is_some_and(|s| s != item.status) {
            return false;
        }
        if self.retro_id.is_some_and(|r| r != item.retro_id) {
            return false;
        }
        if let Some(term) = self.search_term() {
            let in_title = item.title.to_lowercase().contains(&term);
            let in_description = item
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term));
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}

// ActionItem API DTOs
#[derive(Deserialize, validator::Validate)]
pub struct CreateActionItemRequest {
    #[validate(length(max = 255, message = "Title is too long (max 255 characters)"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub source_card_ids: Vec<Uuid>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Deserialize, Default, validator::Validate)]
pub struct UpdateActionItemRequest {
    #[validate(length(max = 255, message = "Title is too long (max 255 characters)"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub assigned_to: Option<Option<Uuid>>,
}

#[derive(Deserialize, Default)]
pub struct ActionItemQuery {
    pub status: Option<String>,
    pub retro_id: Option<Uuid>,
    pub search: Option<String>,
}

// 区分字段缺失与显式 null
fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> ActionItem {
        ActionItem {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            retro_id: Uuid::new_v4(),
            title: "Fix build speed".into(),
            description: Some("Cache the dependency layer".into()),
            status: ActionItemStatus::Open,
            source_card_ids: vec![],
            assigned_to: Some(Uuid::new_v4()),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn update_request_distinguishes_null_from_missing() {
        let req: UpdateActionItemRequest =
            serde_json::from_str(r#"{"assigned_to": null}"#).unwrap();
        assert_eq!(req.assigned_to, Some(None));
        assert_eq!(req.description, None);

        let req: UpdateActionItemRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(req.assigned_to, None);
    }

    #[test]
    fn changes_apply_only_present_fields() {
        let mut it = item();
        let changes = ActionItemChanges {
            status: Some(ActionItemStatus::Done),
            assigned_to: Some(None),
            ..Default::default()
        };
        changes.apply_to(&mut it);
        assert_eq!(it.status, ActionItemStatus::Done);
        assert_eq!(it.assigned_to, None);
        assert_eq!(it.title, "Fix build speed");
        assert!(it.description.is_some());
    }

    #[test]
    fn filter_matches_title_or_description() {
        let it = item();
        let by_desc = ActionItemFilter {
            search: Some("DEPENDENCY".into()),
            ..Default::default()
        };
        assert!(by_desc.matches(&it));

        let wrong_status = ActionItemFilter {
            status: Some(ActionItemStatus::Done),
            ..Default::default()
        };
        assert!(!wrong_status.matches(&it));

        let wrong_retro = ActionItemFilter {
            retro_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!wrong_retro.matches(&it));
    }
}
