use serde::Serialize;

// 统一API响应结构
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
    pub timestamp: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

// 便捷构造函数
impl<T> ApiResponse<T> {
    pub fn success(data: T, message: &str) -> Self {
        Self {
            success: true,
            code: 200,
            message: message.to_string(),
            data: Some(data),
            errors: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn created(data: T, message: &str) -> Self {
        Self {
            success: true,
            code: 201,
            message: message.to_string(),
            data: Some(data),
            errors: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Error envelope carrying a single detail entry.
    pub fn failure(code: u16, message: &str, error_code: &str, field: Option<String>) -> Self {
        Self {
            success: false,
            code,
            message: message.to_string(),
            data: None,
            errors: Some(vec![ErrorDetail {
                field,
                code: error_code.to_string(),
                message: message.to_string(),
            }]),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::failure(400, message, "BAD_REQUEST", None)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::failure(401, message, "UNAUTHORIZED", None)
    }

    pub fn forbidden(message: &str) -> Self {
        Self::failure(403, message, "FORBIDDEN", None)
    }

    pub fn not_found(message: &str) -> Self {
        Self::failure(404, message, "NOT_FOUND", None)
    }

    pub fn conflict(message: &str, field: Option<String>, error_code: &str) -> Self {
        Self::failure(409, message, error_code, field)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::failure(500, message, "INTERNAL_ERROR", None)
    }
}

// 业务错误码常量
pub mod error_codes {
    pub const USER_EMAIL_EXISTS: &str = "USER_EMAIL_EXISTS";
    pub const TEAM_MEMBER_EXISTS: &str = "TEAM_MEMBER_EXISTS";
}
