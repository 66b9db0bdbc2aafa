use crate::AppState;
use crate::config::AuthConfig;
use crate::db::models::{AuthUser, User};
use crate::error::{AppError, AppResult};
use axum::{extract::State, http::Request, middleware::Next, response::Response};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid, // user_id
    pub email: String,
    pub exp: u64,    // expiration time
    pub iat: u64,    // issued at
    pub jti: String, // JWT ID
}

/// Issues and verifies HS256 access tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expires_in: config.access_token_expires_in,
        }
    }

    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    pub fn issue(&self, user: &User) -> AppResult<String> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            exp: now + self.expires_in,
            iat: now,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

fn bearer_token<B>(request: &Request<B>) -> Option<String> {
    request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string())
        .filter(|token| !token.is_empty())
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<axum::body::Body>,
    next: Next<axum::body::Body>,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .ok_or_else(|| AppError::auth("Missing or invalid authorization header"))?;

    // 验证 access_token
    let claims = state.tokens.verify(&token)?;

    // 从存储加载用户，令牌中的邮箱可能已过期
    let user = state
        .store
        .find_user_by_id(claims.sub)?
        .ok_or_else(|| AppError::auth("User no longer exists"))?;

    request.extensions_mut().insert(AuthUser::from(&user));

    Ok(next.run(request).await)
}
