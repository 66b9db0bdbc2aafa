pub mod action_items;
pub mod auth;
pub mod cards;
pub mod health;
pub mod retros;
pub mod teams;

use crate::AppState;
use crate::middleware::{auth::auth_middleware, logger::logger, store_health::require_store};
use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    // 无需认证的路由
    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route_layer(from_fn_with_state(state.clone(), require_store))
        .route("/healthz", get(health::healthz));

    let protected_routes = Router::new()
        .route("/api/auth/profile", get(auth::get_profile))
        .route("/api/teams", get(teams::get_teams).post(teams::create_team))
        .route(
            "/api/teams/:team_id",
            get(teams::get_team).put(teams::update_team),
        )
        .route("/api/teams/:team_id/members", post(teams::add_team_member))
        .route(
            "/api/teams/:team_id/members/:member_id",
            delete(teams::remove_team_member),
        )
        .route(
            "/api/teams/:team_id/retros",
            get(retros::get_retros).post(retros::create_retro),
        )
        .route(
            "/api/teams/:team_id/action-items",
            get(action_items::get_team_action_items),
        )
        .route("/api/retros/:retro_id", get(retros::get_retro))
        .route("/api/retros/:retro_id/board", get(retros::get_board))
        .route("/api/retros/:retro_id/cards", post(cards::create_card))
        .route(
            "/api/retros/:retro_id/cards/:card_id",
            put(cards::update_card).delete(cards::delete_card),
        )
        .route(
            "/api/retros/:retro_id/action-items",
            post(action_items::create_action_item),
        )
        .route(
            "/api/action-items/:action_item_id",
            get(action_items::get_action_item).put(action_items::update_action_item),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(from_fn(logger))
        .with_state(state)
}
