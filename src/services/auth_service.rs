use crate::{
    db::StoreError,
    db::models::api::error_codes,
    db::models::auth::{
        LoginRequest, LoginResponse, NewUser, RegisterRequest, User, UserProfile, normalize_email,
    },
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    middleware::auth::TokenService,
    services::context::RequestContext,
    validation::auth::validate_register_name,
};

pub struct AuthService;

fn email_taken() -> AppError {
    AppError::conflict_with_code(
        "User with this email already exists",
        Some("email".to_string()),
        error_codes::USER_EMAIL_EXISTS,
    )
}

// bcrypt 是 CPU 密集操作，放到阻塞线程池
async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))?
        .map_err(AppError::from)
}

impl AuthService {
    pub async fn register<S>(
        store: &S,
        tokens: &TokenService,
        bcrypt_cost: u32,
        req: RegisterRequest,
    ) -> AppResult<LoginResponse>
    where
        S: UserRepository + ?Sized,
    {
        let name = validate_register_name(&req.name)?;
        let email = normalize_email(&req.email);

        // Check if email already exists
        if store.find_user_by_email(&email)?.is_some() {
            return Err(email_taken());
        }

        let password_hash = hash_password(req.password, bcrypt_cost).await?;

        let new_user = NewUser {
            email,
            name,
            password_hash,
        };
        let user = match store.insert_user(&new_user) {
            Ok(user) => user,
            Err(StoreError::Duplicate(_)) => return Err(email_taken()),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = %user.id, "User registered");
        Self::session_for(tokens, &user)
    }

    pub async fn login<S>(
        store: &S,
        tokens: &TokenService,
        req: LoginRequest,
    ) -> AppResult<LoginResponse>
    where
        S: UserRepository + ?Sized,
    {
        let email = normalize_email(&req.email);
        let user = store
            .find_user_by_email(&email)?
            .ok_or_else(|| AppError::auth("Invalid email or password"))?;

        if !verify_password(req.password, user.password_hash.clone()).await? {
            return Err(AppError::auth("Invalid email or password"));
        }

        Self::session_for(tokens, &user)
    }

    pub fn get_profile<S>(store: &S, ctx: &RequestContext) -> AppResult<UserProfile>
    where
        S: UserRepository + ?Sized,
    {
        let user = store
            .find_user_by_id(ctx.user_id)?
            .ok_or_else(|| AppError::not_found("User"))?;
        Ok(user.profile())
    }

    fn session_for(tokens: &TokenService, user: &User) -> AppResult<LoginResponse> {
        Ok(LoginResponse {
            access_token: tokens.issue(user)?,
            token_type: "Bearer".to_string(),
            expires_in: tokens.expires_in(),
            user: user.profile(),
        })
    }
}
