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
    db::models::api::ApiResponse,
    db::models::auth::AuthUser,
    db::models::card::BoardQuery,
    db::models::retro::{CreateRetroRequest, RetroFilter},
    services::authorization::{require_retro_member, require_team_member},
    services::context::RequestContext,
    services::{CardsService, RetrosService},
    validation::{ValidatedJson, ValidatedPath},
};

pub async fn get_retros(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(team_id): ValidatedPath<Uuid>,
    Query(filter): Query<RetroFilter>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_team_member(store, &ctx, Some(team_id))
        .and_then(|team| RetrosService::list(store, &team, &filter));

    match result {
        Ok(retros) => {
            let response = ApiResponse::success(retros, "Retros retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn create_retro(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(team_id): ValidatedPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateRetroRequest>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_team_member(store, &ctx, Some(team_id))
        .and_then(|team| RetrosService::create(store, &ctx, &team, &payload));

    match result {
        Ok(retro) => {
            let response = ApiResponse::created(retro, "Retro created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn get_retro(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(retro_id): ValidatedPath<Uuid>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    match require_retro_member(state.store.as_ref(), &ctx, Some(retro_id)) {
        Ok((retro, _team)) => {
            let response = ApiResponse::success(retro, "Retro retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// 看板：按列分组的卡片
pub async fn get_board(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(retro_id): ValidatedPath<Uuid>,
    Query(params): Query<BoardQuery>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_retro_member(store, &ctx, Some(retro_id))
        .and_then(|(retro, _team)| CardsService::board(store, &retro, params.show_deleted));

    match result {
        Ok(board) => {
            let response = ApiResponse::success(board, "Board retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
