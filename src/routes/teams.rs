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
    db::models::team::{CreateTeamRequest, InviteMemberRequest, UpdateTeamRequest},
    services::authorization::{require_team_member, require_team_owner},
    services::context::RequestContext,
    services::{TeamMembersService, TeamsService},
    validation::{ValidatedJson, ValidatedPath},
};

/// 创建团队
pub async fn create_team(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTeamRequest>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    match TeamsService::create(state.store.as_ref(), &ctx, &payload.name) {
        Ok(team) => {
            let response = ApiResponse::created(team, "Team created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// 当前用户的团队列表
pub async fn get_teams(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    match TeamsService::list_for_user(state.store.as_ref(), &ctx) {
        Ok(teams) => {
            let response = ApiResponse::success(teams, "Teams retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn get_team(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(team_id): ValidatedPath<Uuid>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    match require_team_member(state.store.as_ref(), &ctx, Some(team_id)) {
        Ok(team) => {
            let response = ApiResponse::success(team, "Team retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn update_team(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(team_id): ValidatedPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTeamRequest>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_team_owner(store, &ctx, Some(team_id))
        .and_then(|team| TeamsService::rename(store, &team, &payload.name));

    match result {
        Ok(team) => {
            let response = ApiResponse::success(team, "Team updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// 邀请成员（按邮箱）
pub async fn add_team_member(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath(team_id): ValidatedPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<InviteMemberRequest>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_team_owner(store, &ctx, Some(team_id)).and_then(|team| {
        TeamMembersService::add_member(store, team.id, &payload.email, payload.role.as_deref())
    });

    match result {
        Ok(team) => {
            let response = ApiResponse::created(team, "Member added successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn remove_team_member(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedPath((team_id, member_id)): ValidatedPath<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    let store = state.store.as_ref();
    let result = require_team_owner(store, &ctx, Some(team_id))
        .and_then(|team| TeamMembersService::remove_member(store, team.id, member_id));

    match result {
        Ok(team) => {
            let response = ApiResponse::success(team, "Member removed successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
