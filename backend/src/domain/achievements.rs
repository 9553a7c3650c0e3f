//! Achievement definitions and unlock evaluation.
//!
//! Conditions form a closed set so every kind has an explicit evaluator and
//! the compiler checks exhaustiveness. Storage keeps the flat
//! `condition_type` / `condition_value` / `condition_key` encoding; decoding
//! happens once at the adapter boundary via [`AchievementCondition::decode`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{BusinessCalendar, Order};

/// Achievement identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementId(Uuid);

impl AchievementId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grouping used by the badges screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Milestone,
    Streak,
    Points,
    Special,
    Team,
}

impl AchievementCategory {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Milestone => "milestone",
            Self::Streak => "streak",
            Self::Points => "points",
            Self::Special => "special",
            Self::Team => "team",
        }
    }
}

impl FromStr for AchievementCategory {
    type Err = ConditionDecodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "milestone" => Ok(Self::Milestone),
            "streak" => Ok(Self::Streak),
            "points" => Ok(Self::Points),
            "special" => Ok(Self::Special),
            "team" => Ok(Self::Team),
            other => Err(ConditionDecodeError::UnknownCategory(other.to_owned())),
        }
    }
}

/// Predicates on the triggering sale that do not reduce to a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CustomCondition {
    /// Sale made before the given local hour.
    EarlyBird { before_hour: u32 },
    /// Sale carrying at least this many add-ons.
    AddOnBundle { min_add_ons: u32 },
    /// Sale made on a Saturday or Sunday.
    WeekendSale,
}

/// Unlock condition of an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AchievementCondition {
    /// Lifetime qualifying sales reach the threshold.
    SalesCount(u32),
    /// Current streak reaches the threshold.
    SalesStreak(u32),
    /// Lifetime points reach the threshold.
    PointsTotal(u32),
    /// Predicate on the triggering sale.
    Custom(CustomCondition),
}

/// Errors raised while decoding stored achievement rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionDecodeError {
    #[error("unknown condition type: {0}")]
    UnknownType(String),
    #[error("unknown custom condition: {0:?}")]
    UnknownCustomKey(Option<String>),
    #[error("condition value must be non-negative, got {0}")]
    NegativeValue(i32),
    #[error("unknown achievement category: {0}")]
    UnknownCategory(String),
}

impl AchievementCondition {
    /// Decode the flat storage encoding.
    pub fn decode(
        condition_type: &str,
        condition_value: i32,
        condition_key: Option<&str>,
    ) -> Result<Self, ConditionDecodeError> {
        let value = u32::try_from(condition_value)
            .map_err(|_| ConditionDecodeError::NegativeValue(condition_value))?;
        match condition_type {
            "sales_count" => Ok(Self::SalesCount(value)),
            "sales_streak" => Ok(Self::SalesStreak(value)),
            "points_total" => Ok(Self::PointsTotal(value)),
            "custom" => match condition_key {
                Some("early_bird") => Ok(Self::Custom(CustomCondition::EarlyBird {
                    before_hour: value,
                })),
                Some("add_on_bundle") => Ok(Self::Custom(CustomCondition::AddOnBundle {
                    min_add_ons: value,
                })),
                Some("weekend_sale") => Ok(Self::Custom(CustomCondition::WeekendSale)),
                other => Err(ConditionDecodeError::UnknownCustomKey(
                    other.map(str::to_owned),
                )),
            },
            other => Err(ConditionDecodeError::UnknownType(other.to_owned())),
        }
    }

    /// Encode into `(condition_type, condition_value, condition_key)`.
    pub fn encode(self) -> (&'static str, u32, Option<&'static str>) {
        match self {
            Self::SalesCount(n) => ("sales_count", n, None),
            Self::SalesStreak(n) => ("sales_streak", n, None),
            Self::PointsTotal(n) => ("points_total", n, None),
            Self::Custom(CustomCondition::EarlyBird { before_hour }) => {
                ("custom", before_hour, Some("early_bird"))
            }
            Self::Custom(CustomCondition::AddOnBundle { min_add_ons }) => {
                ("custom", min_add_ons, Some("add_on_bundle"))
            }
            Self::Custom(CustomCondition::WeekendSale) => ("custom", 0, Some("weekend_sale")),
        }
    }

    /// Test the condition against refreshed counters.
    pub fn is_met(&self, context: &ProgressContext<'_>) -> bool {
        match *self {
            Self::SalesCount(threshold) => context.lifetime_sales >= u64::from(threshold),
            Self::SalesStreak(threshold) => context.current_streak >= threshold,
            Self::PointsTotal(threshold) => context.lifetime_points >= u64::from(threshold),
            Self::Custom(custom) => custom.is_met(context),
        }
    }
}

impl CustomCondition {
    fn is_met(self, context: &ProgressContext<'_>) -> bool {
        let Some(sale) = context.triggering_sale else {
            return false;
        };
        if !sale.is_qualifying() {
            return false;
        }
        match self {
            Self::EarlyBird { before_hour } => {
                context.calendar.hour_of(sale.created_at) < before_hour
            }
            Self::AddOnBundle { min_add_ons } => sale.add_ons_count >= min_add_ons,
            Self::WeekendSale => matches!(
                context.calendar.weekday_of(sale.created_at),
                Weekday::Sat | Weekday::Sun
            ),
        }
    }
}

/// Reference data describing one achievement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementDefinition {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    pub condition: AchievementCondition,
    pub points_reward: u32,
    pub is_secret: bool,
}

/// An unlock recorded for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAchievement {
    pub achievement_id: AchievementId,
    pub earned_at: DateTime<Utc>,
}

/// Counters an achievement condition is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct ProgressContext<'a> {
    /// Non-cancelled orders owned by the user.
    pub lifetime_sales: u64,
    pub current_streak: u32,
    pub lifetime_points: u64,
    /// Order that triggered the evaluation, when there is one.
    pub triggering_sale: Option<&'a Order>,
    pub calendar: &'a BusinessCalendar,
}

/// Definitions newly satisfied by `context`, skipping ones already unlocked.
///
/// Pure and idempotent: calling it again with the returned ids added to
/// `unlocked` yields nothing.
pub fn evaluate<'d>(
    definitions: &'d [AchievementDefinition],
    unlocked: &HashSet<AchievementId>,
    context: &ProgressContext<'_>,
) -> Vec<&'d AchievementDefinition> {
    definitions
        .iter()
        .filter(|definition| !unlocked.contains(&definition.id))
        .filter(|definition| definition.condition.is_met(context))
        .collect()
}

/// Achievement as shown to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AchievementView {
    #[schema(value_type = String, format = "uuid")]
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub category: AchievementCategory,
    pub points_reward: u32,
    pub is_secret: bool,
    pub unlocked: bool,
    pub earned_at: Option<DateTime<Utc>>,
}

const HIDDEN_NAME: &str = "???";
const HIDDEN_DESCRIPTION: &str = "Keep selling to discover this achievement.";

impl AchievementView {
    /// Project a definition for a viewer; secret ones stay hidden until earned.
    pub fn project(definition: &AchievementDefinition, earned: Option<&UserAchievement>) -> Self {
        let unlocked = earned.is_some();
        let hidden = definition.is_secret && !unlocked;
        Self {
            id: definition.id,
            name: if hidden {
                HIDDEN_NAME.to_owned()
            } else {
                definition.name.clone()
            },
            description: if hidden {
                HIDDEN_DESCRIPTION.to_owned()
            } else {
                definition.description.clone()
            },
            category: definition.category,
            points_reward: definition.points_reward,
            is_secret: definition.is_secret,
            unlocked,
            earned_at: earned.map(|achievement| achievement.earned_at),
        }
    }
}
