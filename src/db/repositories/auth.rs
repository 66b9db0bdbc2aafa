use diesel::prelude::*;
use uuid::Uuid;

use crate::db::StoreResult;
use crate::db::models::auth::{NewUser, User};
use crate::db::repositories::{PgStore, UserRepository};

impl UserRepository for PgStore {
    fn find_user_by_id(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.conn()?;
        let user = users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(user)
    }

    fn find_user_by_email(&self, target_email: &str) -> StoreResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.conn()?;
        let user = users
            .filter(email.eq(target_email))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(user)
    }

    fn insert_user(&self, new_user: &NewUser) -> StoreResult<User> {
        let mut conn = self.conn()?;
        let user = diesel::insert_into(crate::schema::users::table)
            .values(new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)?;
        Ok(user)
    }
}
