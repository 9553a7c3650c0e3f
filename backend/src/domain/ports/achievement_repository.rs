//! Port for achievement definitions and unlocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AchievementDefinition, AchievementId, UserAchievement, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by achievement repository adapters.
    pub enum AchievementRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => ServiceUnavailable: "achievement repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError: "achievement repository query failed: {message}",
    }
}

/// Port for achievements.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementRepository: Send + Sync {
    /// All decodable definitions. Rows with unknown condition encodings are
    /// skipped by the adapter.
    async fn definitions(&self) -> Result<Vec<AchievementDefinition>, AchievementRepositoryError>;

    /// Unlocks recorded for a user.
    async fn unlocked_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserAchievement>, AchievementRepositoryError>;

    /// Record an unlock unless the pair already exists.
    ///
    /// Returns `true` when a row was inserted and `false` when the user
    /// already had the achievement, including when a concurrent insert won.
    async fn insert_unlock(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
        earned_at: DateTime<Utc>,
    ) -> Result<bool, AchievementRepositoryError>;
}

/// Fixture repository without definitions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAchievementRepository;

#[async_trait]
impl AchievementRepository for FixtureAchievementRepository {
    async fn definitions(&self) -> Result<Vec<AchievementDefinition>, AchievementRepositoryError> {
        Ok(Vec::new())
    }

    async fn unlocked_for(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<UserAchievement>, AchievementRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert_unlock(
        &self,
        _user_id: &UserId,
        _achievement_id: &AchievementId,
        _earned_at: DateTime<Utc>,
    ) -> Result<bool, AchievementRepositoryError> {
        Ok(false)
    }
}
