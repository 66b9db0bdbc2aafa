// Sub-modules organized by functional domain
pub mod action_item;
pub mod api;
pub mod auth;
pub mod card;
pub mod retro;
pub mod team;

// API response structures
pub use api::*;

// Authentication and user models
pub use auth::*;

// Retro board models
pub use card::*;
pub use retro::*;

// Action item models
pub use action_item::*;

// Team models
pub use team::*;
