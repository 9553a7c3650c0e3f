//! Driving port for setting goals.

use async_trait::async_trait;

use crate::domain::{Error, GoalMetric, GoalPeriod, GoalProgress, UserId};

/// Domain use-case port for goal updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoalsCommand: Send + Sync {
    /// Insert or replace a goal and return it with current progress.
    async fn set_goal(
        &self,
        user_id: &UserId,
        period: GoalPeriod,
        metric: GoalMetric,
        target: u32,
    ) -> Result<GoalProgress, Error>;
}

/// Fixture command echoing the goal with zero progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGoalsCommand;

#[async_trait]
impl GoalsCommand for FixtureGoalsCommand {
    async fn set_goal(
        &self,
        _user_id: &UserId,
        period: GoalPeriod,
        metric: GoalMetric,
        target: u32,
    ) -> Result<GoalProgress, Error> {
        Ok(GoalProgress {
            period,
            metric,
            target,
            current: 0,
            completed: false,
        })
    }
}
