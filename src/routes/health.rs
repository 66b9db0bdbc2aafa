use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;
use crate::db::models::api::ApiResponse;
use crate::error::AppError;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Handler for `GET /healthz`. Reports 503 while the store is unreachable.
pub async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping() {
        Ok(()) => {
            let response = ApiResponse::success(HealthStatus { status: "ok" }, "Service is healthy");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => AppError::Unavailable(e.to_string()).into_response(),
    }
}
