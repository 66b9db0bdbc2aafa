pub mod auth;
pub mod logger;
pub mod store_health;

pub use logger::{TRACE_ID_HEADER, TraceId};
