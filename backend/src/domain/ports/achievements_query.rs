//! Driving port for the achievements screen.

use async_trait::async_trait;

use crate::domain::{AchievementView, Error, UserId};

/// Domain use-case port for listing achievements.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementsQuery: Send + Sync {
    /// Every definition with the user's unlock state; secret ones hidden
    /// until earned.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<AchievementView>, Error>;
}

/// Fixture query without achievements.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAchievementsQuery;

#[async_trait]
impl AchievementsQuery for FixtureAchievementsQuery {
    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<AchievementView>, Error> {
        Ok(Vec::new())
    }
}
