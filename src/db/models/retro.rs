use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Retro models
#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::retros)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Retro {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub sprint_label: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = crate::schema::retros)]
pub struct NewRetro {
    pub team_id: Uuid,
    pub name: String,
    pub sprint_label: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
}

/// Optional sprint window. Either end may be open.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn is_ordered(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct RetroFilter {
    pub search: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl RetroFilter {
    /// Blank search strings are treated as no search.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, retro: &Retro) -> bool {
        if let Some(term) = self.search_term() {
            if !retro.name.to_lowercase().contains(&term) {
                return false;
            }
        }
        if self.created_from.is_some_and(|from| retro.created_at < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| retro.created_at > to) {
            return false;
        }
        true
    }
}

#[derive(Deserialize, validator::Validate)]
pub struct CreateRetroRequest {
    #[validate(length(max = 255, message = "Retro name is too long (max 255 characters)"))]
    pub name: String,
    pub sprint_label: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}
