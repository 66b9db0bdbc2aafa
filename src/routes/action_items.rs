use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    AppState,
    db::models::action_item::{ActionItemQuery, CreateActionItemRequest, UpdateActionItemRequest},
    db::models::api::ApiResponse,
    db::models::auth::AuthUser,
    services::ActionItemsService,
    services::authorization::{
        require_action_item_member, require_retro_member, require_team_member,
    },
    services::context::RequestContext,
    validation::{ValidatedJson, ValidatedPath},
};

pub async fn get_team_action_items(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(team_id): ValidatedPath<Uuid>,
    Query(query): Query<ActionItemQuery>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_team_member(store, &ctx, Some(team_id))
        .and_then(|team| ActionItemsService::list(store, &team, &query));

    match result {
        Ok(items) => {
            let response = ApiResponse::success(items, "Action items retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn create_action_item(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(retro_id): ValidatedPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateActionItemRequest>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_retro_member(store, &ctx, Some(retro_id))
        .and_then(|(retro, _team)| ActionItemsService::create(store, &ctx, &retro, &payload));

    match result {
        Ok(item) => {
            let response = ApiResponse::created(item, "Action item created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn get_action_item(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(item_id): ValidatedPath<Uuid>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    match require_action_item_member(state.store.as_ref(), &ctx, Some(item_id)) {
        Ok((item, _team)) => {
            let response = ApiResponse::success(item, "Action item retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn update_action_item(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(item_id): ValidatedPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateActionItemRequest>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_action_item_member(store, &ctx, Some(item_id))
        .and_then(|(item, _team)| ActionItemsService::update(store, &item, &payload));

    match result {
        Ok(item) => {
            let response = ApiResponse::success(item, "Action item updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
