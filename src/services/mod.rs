pub mod action_items_service;
pub mod auth_service;
pub mod authorization;
pub mod cards_service;
pub mod context;
pub mod retros_service;
pub mod team_members_service;
pub mod teams_service;

pub use action_items_service::ActionItemsService;
pub use auth_service::AuthService;
pub use cards_service::CardsService;
pub use retros_service::RetrosService;
pub use team_members_service::TeamMembersService;
pub use teams_service::TeamsService;
