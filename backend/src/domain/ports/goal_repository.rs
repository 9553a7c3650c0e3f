//! Port for personal goals.

use async_trait::async_trait;

use crate::domain::{Goal, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by goal repository adapters.
    pub enum GoalRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => ServiceUnavailable: "goal repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError: "goal repository query failed: {message}",
    }
}

/// Port for goal storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Goals set by a user.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Goal>, GoalRepositoryError>;

    /// Insert or replace the goal for its `(user, period, metric)`.
    async fn upsert(&self, goal: &Goal) -> Result<(), GoalRepositoryError>;
}

/// Fixture repository without goals.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGoalRepository;

#[async_trait]
impl GoalRepository for FixtureGoalRepository {
    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Goal>, GoalRepositoryError> {
        Ok(Vec::new())
    }

    async fn upsert(&self, _goal: &Goal) -> Result<(), GoalRepositoryError> {
        Ok(())
    }
}
