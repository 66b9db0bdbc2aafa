use retro_backend::{
    config::Config,
    db::models::auth::{LoginRequest, RegisterRequest},
    db::repositories::MemoryStore,
    error::AppError,
    middleware::auth::TokenService,
    services::AuthService,
    services::context::RequestContext,
};

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        name: "Ada Lovelace".to_string(),
        email: email.to_string(),
        password: "correct horse".to_string(),
    }
}

#[tokio::test]
async fn register_then_login_issues_verifiable_tokens() {
    let store = MemoryStore::new();
    let tokens = TokenService::new(&Config::default().auth());

    let session = AuthService::register(&store, &tokens, 4, register_request("  Ada@X.com "))
        .await
        .unwrap();
    assert_eq!(session.token_type, "Bearer");
    assert_eq!(session.user.email, "ada@x.com");
    assert_eq!(session.user.avatar_initials, "AL");

    let login = AuthService::login(
        &store,
        &tokens,
        LoginRequest {
            email: "ADA@x.com".to_string(),
            password: "correct horse".to_string(),
        },
    )
    .await
    .unwrap();
    let claims = tokens.verify(&login.access_token).unwrap();
    assert_eq!(claims.sub, session.user.id);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let store = MemoryStore::new();
    let tokens = TokenService::new(&Config::default().auth());

    AuthService::register(&store, &tokens, 4, register_request("ada@x.com"))
        .await
        .unwrap();
    let result = AuthService::register(&store, &tokens, 4, register_request("ADA@x.com")).await;
    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let store = MemoryStore::new();
    let tokens = TokenService::new(&Config::default().auth());
    AuthService::register(&store, &tokens, 4, register_request("ada@x.com"))
        .await
        .unwrap();

    for (email, password) in [("ada@x.com", "wrong password"), ("nobody@x.com", "correct horse")] {
        let result = AuthService::login(
            &store,
            &tokens,
            LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await;
        match result {
            Err(AppError::Auth { message }) => assert_eq!(message, "Invalid email or password"),
            other => panic!("expected auth error, got {:?}", other.map(|s| s.user.id)),
        }
    }
}

#[tokio::test]
async fn profile_reflects_stored_user() {
    let store = MemoryStore::new();
    let tokens = TokenService::new(&Config::default().auth());
    let session = AuthService::register(&store, &tokens, 4, register_request("ada@x.com"))
        .await
        .unwrap();

    let ctx = RequestContext {
        user_id: session.user.id,
        email: session.user.email.clone(),
    };
    let profile = AuthService::get_profile(&store, &ctx).unwrap();
    assert_eq!(profile, session.user);
}
