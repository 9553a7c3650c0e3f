//! Diesel-backed `UserDirectory` resolving session identities.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{AuthenticatedUser, UserId};

use super::error_mapping::port_error_mapping;
use super::models::UserIdentityRow;
use super::pool::DbPool;
use super::schema::users;

/// Reads `{id, email, role}` from the users table.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

port_error_mapping!(UserDirectoryError, "user directory");

/// An unknown role is treated as an unknown user, so it can never gain
/// elevated access.
fn row_to_user(row: UserIdentityRow) -> Option<AuthenticatedUser> {
    match row.role.parse() {
        Ok(role) => Some(AuthenticatedUser {
            id: UserId::from_uuid(row.id),
            email: row.email,
            role,
        }),
        Err(err) => {
            warn!(user_id = %row.id, error = %err, "user has an unrecognised role");
            None
        }
    }
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<AuthenticatedUser>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserIdentityRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserIdentityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.and_then(row_to_user))
    }
}
