//! Port resolving session identities to users.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } => ServiceUnavailable: "user directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } => InternalError: "user directory query failed: {message}",
    }
}

/// Port for resolving `{id, email, role}` of the session user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch the identity behind a session user id.
    async fn find_user(&self, id: &UserId) -> Result<Option<AuthenticatedUser>, UserDirectoryError>;
}

/// Fixture directory that knows nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn find_user(&self, _id: &UserId) -> Result<Option<AuthenticatedUser>, UserDirectoryError> {
        Ok(None)
    }
}
