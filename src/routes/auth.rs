use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::{
    AppState,
    db::models::api::ApiResponse,
    db::models::auth::{AuthUser, LoginRequest, RegisterRequest},
    services::{AuthService, context::RequestContext},
    validation::ValidatedJson,
};

pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> impl IntoResponse {
    match AuthService::register(
        state.store.as_ref(),
        &state.tokens,
        state.config.bcrypt_cost,
        payload,
    )
    .await
    {
        Ok(session) => {
            let response = ApiResponse::created(session, "User registered successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> impl IntoResponse {
    match AuthService::login(state.store.as_ref(), &state.tokens, payload).await {
        Ok(session) => {
            let response = ApiResponse::success(session, "Login successful");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let ctx = RequestContext::from(&auth_user);
    match AuthService::get_profile(state.store.as_ref(), &ctx) {
        Ok(profile) => {
            let response = ApiResponse::success(profile, "Profile retrieved successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
