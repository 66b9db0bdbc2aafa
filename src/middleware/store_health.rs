use crate::AppState;
use crate::error::AppError;
use axum::{extract::State, http::Request, middleware::Next, response::Response};
use std::sync::Arc;

/// Rejects with 503 before the handler runs when the store is unreachable.
pub async fn require_store(
    State(state): State<Arc<AppState>>,
    request: Request<axum::body::Body>,
    next: Next<axum::body::Body>,
) -> Result<Response, AppError> {
    if let Err(e) = state.store.ping() {
        tracing::warn!("Store health check failed: {}", e);
        return Err(AppError::Unavailable(e.to_string()));
    }
    Ok(next.run(request).await)
}
