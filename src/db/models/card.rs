use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::enums::CardColumn;

// Card models
#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Card {
    pub id: Uuid,
    pub retro_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    #[diesel(column_name = card_column)]
    pub column: CardColumn,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = crate::schema::cards)]
pub struct NewCard {
    pub retro_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    #[diesel(column_name = card_column)]
    pub column: CardColumn,
}

/// Cards of one retro keyed by column. Every column is always present.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Board {
    #[serde(rename = "Went Well")]
    pub went_well: Vec<Card>,
    #[serde(rename = "Needs Improvement")]
    pub needs_improvement: Vec<Card>,
    #[serde(rename = "Kudos")]
    pub kudos: Vec<Card>,
}

impl Board {
    /// Partitions `cards` into columns, newest first within each column.
    /// Soft-deleted cards are dropped unless `include_deleted` is set.
    pub fn build(cards: impl IntoIterator<Item = Card>, include_deleted: bool) -> Self {
        let mut cards: Vec<Card> = cards
            .into_iter()
            .filter(|c| include_deleted || !c.is_deleted)
            .collect();
        // stable: equal timestamps keep input order
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut board = Board::default();
        for card in cards {
            board.column_mut(card.column).push(card);
        }
        board
    }

    pub fn column(&self, column: CardColumn) -> &[Card] {
        match column {
            CardColumn::WentWell => &self.went_well,
            CardColumn::NeedsImprovement => &self.needs_improvement,
            CardColumn::Kudos => &self.kudos,
        }
    }

    fn column_mut(&mut self, column: CardColumn) -> &mut Vec<Card> {
        match column {
            CardColumn::WentWell => &mut self.went_well,
            CardColumn::NeedsImprovement => &mut self.needs_improvement,
            CardColumn::Kudos => &mut self.kudos,
        }
    }

    pub fn len(&self) -> usize {
        self.went_well.len() + self.needs_improvement.len() + self.kudos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Deserialize, validator::Validate)]
pub struct CreateCardRequest {
    pub content: String,
    pub column: String,
}

#[derive(Deserialize, validator::Validate)]
pub struct UpdateCardRequest {
    pub content: String,
}

#[derive(Deserialize, Default)]
pub struct BoardQuery {
    #[serde(default, alias = "showDeleted")]
    pub show_deleted: bool,
}
