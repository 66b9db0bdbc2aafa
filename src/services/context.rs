use uuid::Uuid;

use crate::db::models::auth::AuthUser;

/// Identity of the caller, as loaded by the auth middleware.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub email: String,
}

impl From<&AuthUser> for RequestContext {
    fn from(user: &AuthUser) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
        }
    }
}
