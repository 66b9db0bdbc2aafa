pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod services;
pub mod validation;

use crate::config::{Config, StorageBackend};
use crate::db::create_pool;
use crate::db::repositories::{MemoryStore, PgStore, Store};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::TokenService;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let tokens = TokenService::new(&config.auth());
        Self {
            store,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }

    /// Builds the store selected by `STORAGE_BACKEND`.
    pub fn from_config(config: Config) -> AppResult<Self> {
        let store: Arc<dyn Store> = match config.storage_backend {
            StorageBackend::Postgres => {
                let db = config.database().ok_or_else(|| {
                    AppError::Config("DATABASE_URL is required when STORAGE_BACKEND=postgres".into())
                })?;
                Arc::new(PgStore::new(create_pool(&db)))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory store, data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(store, config))
    }
}

pub fn init_tracing(config: &Config) {
    // RUST_LOG 优先，其次 LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = match config.log_format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    };
}
