// Service-level tests against the in-memory store

mod action_item;
mod auth;
mod authorization;
mod card;
mod team;

use retro_backend::{
    db::models::auth::NewUser,
    db::models::retro::{CreateRetroRequest, Retro},
    db::models::team::Team,
    db::repositories::{MemoryStore, UserRepository},
    services::context::RequestContext,
    services::{RetrosService, TeamsService},
};

pub fn register(store: &MemoryStore, email: &str, name: &str) -> RequestContext {
    let user = store
        .insert_user(&NewUser {
            email: email.to_string(),
            name: name.to_string(),
            password_hash: "not-a-real-hash".to_string(),
        })
        .unwrap();
    RequestContext {
        user_id: user.id,
        email: user.email,
    }
}

pub fn team_owned_by(store: &MemoryStore, owner: &RequestContext) -> Team {
    TeamsService::create(store, owner, "Platform").unwrap()
}

pub fn retro_in(store: &MemoryStore, ctx: &RequestContext, team: &Team) -> Retro {
    let req = CreateRetroRequest {
        name: "Sprint 12".to_string(),
        sprint_label: None,
        start_date: None,
        end_date: None,
    };
    RetrosService::create(store, ctx, team, &req).unwrap()
}
