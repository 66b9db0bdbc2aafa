use uuid::Uuid;

use crate::{
    db::models::card::{Board, Card, NewCard},
    db::models::retro::Retro,
    db::repositories::CardRepository,
    error::{AppError, AppResult},
    services::authorization::require_resource_owner,
    services::context::RequestContext,
    validation::card::{parse_card_column, validate_card_content},
};

pub struct CardsService;

impl CardsService {
    pub fn create<S>(
        store: &S,
        ctx: &RequestContext,
        retro: &Retro,
        content: &str,
        column: &str,
    ) -> AppResult<Card>
    where
        S: CardRepository + ?Sized,
    {
        let content = validate_card_content(content)?;
        let column = parse_card_column(column)?;

        let new_card = NewCard {
            retro_id: retro.id,
            author_id: ctx.user_id,
            content,
            column,
        };
        Ok(store.insert_card(&new_card)?)
    }

    /// Loads a card that must belong to `retro`.
    fn find_in_retro<S>(store: &S, retro: &Retro, card_id: Uuid) -> AppResult<Card>
    where
        S: CardRepository + ?Sized,
    {
        store
            .find_card(card_id)?
            .filter(|card| card.retro_id == retro.id)
            .ok_or_else(|| AppError::not_found("Card"))
    }

    pub fn update<S>(
        store: &S,
        ctx: &RequestContext,
        retro: &Retro,
        card_id: Uuid,
        content: &str,
    ) -> AppResult<Card>
    where
        S: CardRepository + ?Sized,
    {
        let card = Self::find_in_retro(store, retro, card_id)?;
        require_resource_owner(&card, ctx, "You can only edit your own cards")?;
        let content = validate_card_content(content)?;

        store
            .update_card_content(card.id, &content)?
            .ok_or_else(|| AppError::not_found("Card"))
    }

    /// Soft delete. Deleting an already deleted card is a no-op.
    pub fn delete<S>(
        store: &S,
        ctx: &RequestContext,
        retro: &Retro,
        card_id: Uuid,
    ) -> AppResult<Card>
    where
        S: CardRepository + ?Sized,
    {
        let card = Self::find_in_retro(store, retro, card_id)?;
        require_resource_owner(&card, ctx, "You can only delete your own cards")?;

        let deleted = store
            .soft_delete_card(card.id)?
            .ok_or_else(|| AppError::not_found("Card"))?;
        if !card.is_deleted {
            tracing::info!(card_id = %card.id, retro_id = %retro.id, "Card soft-deleted");
        }
        Ok(deleted)
    }

    pub fn board<S>(store: &S, retro: &Retro, include_deleted: bool) -> AppResult<Board>
    where
        S: CardRepository + ?Sized,
    {
        let cards = store.list_cards(retro.id, include_deleted)?;
        Ok(Board::build(cards, include_deleted))
    }
}
