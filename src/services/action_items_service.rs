use chrono::Utc;

use crate::{
    db::enums::ActionItemStatus,
    db::models::action_item::{
        ActionItem, ActionItemChanges, ActionItemFilter, ActionItemQuery,
        CreateActionItemRequest, NewActionItem, UpdateActionItemRequest,
    },
    db::models::retro::Retro,
    db::models::team::Team,
    db::repositories::{ActionItemRepository, CardRepository},
    error::{AppError, AppResult},
    services::context::RequestContext,
    validation::{
        action_item::{parse_action_item_status, validate_action_item_title},
        non_blank,
    },
};

pub struct ActionItemsService;

impl ActionItemsService {
    /// Source cards must be live "Needs Improvement" cards of `retro`.
    /// Any mismatch, including a repeated id, fails the whole request.
    pub fn create<S>(
        store: &S,
        ctx: &RequestContext,
        retro: &Retro,
        req: &CreateActionItemRequest,
    ) -> AppResult<ActionItem>
    where
        S: ActionItemRepository + CardRepository + ?Sized,
    {
        let title = validate_action_item_title(&req.title)?;

        if !req.source_card_ids.is_empty() {
            let found = store.count_source_cards(retro.id, &req.source_card_ids)?;
            if found != req.source_card_ids.len() {
                return Err(AppError::validation(
                    "Some source cards are invalid or not from Needs Improvement column",
                ));
            }
        }

        let new_item = NewActionItem {
            team_id: retro.team_id,
            retro_id: retro.id,
            title,
            description: non_blank(req.description.as_deref()),
            status: ActionItemStatus::default(),
            source_card_ids: req.source_card_ids.clone(),
            assigned_to: req.assigned_to,
            created_by: ctx.user_id,
        };
        let item = store.insert_action_item(&new_item)?;
        tracing::info!(action_item_id = %item.id, retro_id = %retro.id, "Action item created");
        Ok(item)
    }

    /// An unrecognised status filter is ignored rather than rejected.
    pub fn list<S>(store: &S, team: &Team, query: &ActionItemQuery) -> AppResult<Vec<ActionItem>>
    where
        S: ActionItemRepository + ?Sized,
    {
        let filter = ActionItemFilter {
            status: query.status.as_deref().and_then(|s| s.parse().ok()),
            retro_id: query.retro_id,
            search: query.search.clone(),
        };
        Ok(store.list_action_items(team.id, &filter)?)
    }

    pub fn update<S>(
        store: &S,
        item: &ActionItem,
        req: &UpdateActionItemRequest,
    ) -> AppResult<ActionItem>
    where
        S: ActionItemRepository + ?Sized,
    {
        let title = req
            .title
            .as_deref()
            .map(validate_action_item_title)
            .transpose()?;
        let status = req
            .status
            .as_deref()
            .map(parse_action_item_status)
            .transpose()?;

        let changes = ActionItemChanges {
            title,
            description: req
                .description
                .as_ref()
                .map(|d| non_blank(d.as_deref())),
            status,
            assigned_to: req.assigned_to,
            updated_at: Some(Utc::now()),
        };

        store
            .update_action_item(item.id, &changes)?
            .ok_or_else(|| AppError::not_found("Action item"))
    }
}
