use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    AppState,
    db::models::api::ApiResponse,
    db::models::auth::AuthUser,
    db::models::card::{CreateCardRequest, UpdateCardRequest},
    services::CardsService,
    services::authorization::require_retro_member,
    services::context::RequestContext,
    validation::{ValidatedJson, ValidatedPath},
};

// 创建卡片
pub async fn create_card(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(retro_id): ValidatedPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateCardRequest>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_retro_member(store, &ctx, Some(retro_id)).and_then(|(retro, _team)| {
        CardsService::create(store, &ctx, &retro, &payload.content, &payload.column)
    });

    match result {
        Ok(card) => {
            let response = ApiResponse::created(card, "Card created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

// 更新卡片（仅作者）
pub async fn update_card(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath((retro_id, card_id)): ValidatedPath<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<UpdateCardRequest>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_retro_member(store, &ctx, Some(retro_id)).and_then(|(retro, _team)| {
        CardsService::update(store, &ctx, &retro, card_id, &payload.content)
    });

    match result {
        Ok(card) => {
            let response = ApiResponse::success(card, "Card updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

// 软删除卡片（仅作者）
pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath((retro_id, card_id)): ValidatedPath<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_retro_member(store, &ctx, Some(retro_id))
        .and_then(|(retro, _team)| CardsService::delete(store, &ctx, &retro, card_id));

    match result {
        Ok(card) => {
            let response = ApiResponse::success(card, "Card deleted successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
