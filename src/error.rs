use crate::db::StoreError;
use crate::db::models::api::ApiResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Authentication error: {message}")]
    Auth { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        field: Option<String>,
        code: Option<String>,
    },

    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. }
            | AppError::BadRequest { .. }
            | AppError::InvariantViolation { .. } => StatusCode::BAD_REQUEST,
            AppError::Auth { .. } | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_) | AppError::Bcrypt(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let response = match self {
            AppError::Validation { ref message } => {
                ApiResponse::<()>::failure(400, message, "VALIDATION_ERROR", None)
            }
            AppError::BadRequest { ref message } => ApiResponse::<()>::bad_request(message),
            AppError::Auth { ref message } => ApiResponse::<()>::unauthorized(message),
            AppError::Forbidden { ref message } => ApiResponse::<()>::forbidden(message),
            AppError::NotFound { ref resource } => {
                ApiResponse::<()>::not_found(&format!("{} not found", resource))
            }
            AppError::Conflict {
                ref message,
                ref field,
                ref code,
            } => ApiResponse::<()>::conflict(
                message,
                field.clone(),
                code.as_deref().unwrap_or("CONFLICT"),
            ),
            AppError::InvariantViolation { ref message } => {
                ApiResponse::<()>::failure(400, message, "INVARIANT_VIOLATION", None)
            }
            AppError::Unavailable(ref e) => {
                tracing::error!("Store unavailable: {}", e);
                ApiResponse::<()>::failure(
                    503,
                    "Database connection not available. Please try again later.",
                    "SERVICE_UNAVAILABLE",
                    None,
                )
            }
            AppError::Config(ref e) => {
                tracing::error!("Configuration error: {}", e);
                ApiResponse::<()>::internal_error("Configuration error")
            }
            AppError::Jwt(ref e) => {
                tracing::debug!("JWT error: {}", e);
                ApiResponse::<()>::unauthorized("Invalid or expired access token")
            }
            AppError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {}", e);
                ApiResponse::<()>::internal_error("Password processing error")
            }
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                ApiResponse::<()>::internal_error("Internal server error")
            }
        };

        (status, Json(response)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(message) => AppError::Unavailable(message),
            StoreError::Duplicate(constraint) => AppError::Conflict {
                message: "Resource already exists".to_string(),
                field: None,
                code: Some(constraint),
            },
            StoreError::Backend(message) => AppError::Internal(message),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

// 便捷的错误创建函数
impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict_with_code(
        message: impl Into<String>,
        field: Option<String>,
        code: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            message: message.into(),
            field,
            code: Some(code.into()),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
