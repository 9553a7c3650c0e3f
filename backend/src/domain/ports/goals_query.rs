//! Driving port for reading goals.

use async_trait::async_trait;

use crate::domain::{Error, GoalProgress, UserId};

/// Domain use-case port for goal progress.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoalsQuery: Send + Sync {
    /// Each goal of the user with progress in its current period.
    async fn goals(&self, user_id: &UserId) -> Result<Vec<GoalProgress>, Error>;
}

/// Fixture query without goals.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGoalsQuery;

#[async_trait]
impl GoalsQuery for FixtureGoalsQuery {
    async fn goals(&self, _user_id: &UserId) -> Result<Vec<GoalProgress>, Error> {
        Ok(Vec::new())
    }
}
