//! Result of running the rewards step for one order.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    AchievementCategory, AchievementDefinition, AchievementId, PointBreakdown, RankChange,
    StreakUpdate,
};

/// Point award for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointsAward {
    pub total_points: u32,
    pub breakdown: PointBreakdown,
}

/// Streak state after the order, plus streak achievement bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub streak_broken: bool,
    pub milestone_reached: Option<u32>,
    /// Rewards of streak achievements unlocked by this order.
    pub bonus_points: u32,
}

impl StreakSummary {
    pub fn from_update(update: &StreakUpdate, bonus_points: u32) -> Self {
        Self {
            current_streak: update.state.current,
            longest_streak: update.state.longest,
            streak_broken: update.streak_broken,
            milestone_reached: update.milestone_reached(),
            bonus_points,
        }
    }
}

/// Achievement unlocked by the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedAchievement {
    #[schema(value_type = String, format = "uuid")]
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    pub points_reward: u32,
}

impl From<&AchievementDefinition> for UnlockedAchievement {
    fn from(definition: &AchievementDefinition) -> Self {
        Self {
            id: definition.id,
            name: definition.name.clone(),
            description: definition.description.clone(),
            category: definition.category,
            points_reward: definition.points_reward,
        }
    }
}

/// Everything the client needs to celebrate a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderGamificationResult {
    pub points: PointsAward,
    pub streak: StreakSummary,
    pub achievements: Vec<UnlockedAchievement>,
    /// `None` when the rank could not be read.
    pub rank_change: Option<RankChange>,
}
