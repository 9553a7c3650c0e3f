//! Per-user reward counters.
//!
//! One row per salesperson, mutated only by the rewards engine. The
//! transition is expressed here as a pure function so the persistence adapter
//! can apply it under a row lock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{StreakState, StreakUpdate, UserId};

/// Aggregated reward counters for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub user_id: UserId,
    /// Current balance, including achievement bonuses.
    pub total_points: u64,
    /// Points ever earned; never decreases.
    pub lifetime_points: u64,
    /// Orders that received a point award.
    pub total_sales: u64,
    pub streak: StreakState,
}

impl UserStats {
    /// Empty counters for a user who has not sold anything yet.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            total_points: 0,
            lifetime_points: 0,
            total_sales: 0,
            streak: StreakState::default(),
        }
    }

    /// Apply a qualifying sale worth `points` made on `sale_day`.
    pub fn apply_sale(&self, points: u32, sale_day: NaiveDate) -> SaleApplication {
        let streak = self.streak.advance(sale_day);
        let after = Self {
            user_id: self.user_id.clone(),
            total_points: self.total_points.saturating_add(u64::from(points)),
            lifetime_points: self.lifetime_points.saturating_add(u64::from(points)),
            total_sales: self.total_sales.saturating_add(1),
            streak: streak.state,
        };
        SaleApplication {
            before: self.clone(),
            after,
            streak,
        }
    }

    /// Credit achievement bonus points.
    pub fn with_bonus(mut self, points: u32) -> Self {
        self.total_points = self.total_points.saturating_add(u64::from(points));
        self.lifetime_points = self.lifetime_points.saturating_add(u64::from(points));
        self
    }
}

/// Counters before and after a sale was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleApplication {
    pub before: UserStats,
    pub after: UserStats,
    pub streak: StreakUpdate,
}
