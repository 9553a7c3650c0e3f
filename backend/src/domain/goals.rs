//! Personal sales goals.
//!
//! Progress is computed from the same window aggregates as the leaderboard,
//! so a goal and the board never disagree about what counted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{TimeRange, UserId};

/// Goal horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GoalPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl GoalPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Leaderboard window matching the period.
    pub fn time_range(self) -> TimeRange {
        match self {
            Self::Daily => TimeRange::Today,
            Self::Weekly => TimeRange::Week,
            Self::Monthly => TimeRange::Month,
        }
    }
}

/// What a goal counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GoalMetric {
    Sales,
    Points,
}

impl GoalMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Points => "points",
        }
    }
}

/// Error returned when stored goal columns do not decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GoalValidationError {
    #[error("goal target must be greater than zero")]
    ZeroTarget,
    #[error("unknown goal period: {0}")]
    UnknownPeriod(String),
    #[error("unknown goal metric: {0}")]
    UnknownMetric(String),
}

impl std::str::FromStr for GoalPeriod {
    type Err = GoalValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(GoalValidationError::UnknownPeriod(other.to_owned())),
        }
    }
}

impl std::str::FromStr for GoalMetric {
    type Err = GoalValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sales" => Ok(Self::Sales),
            "points" => Ok(Self::Points),
            other => Err(GoalValidationError::UnknownMetric(other.to_owned())),
        }
    }
}

/// A user's target for one period and metric. At most one per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub user_id: UserId,
    pub period: GoalPeriod,
    pub metric: GoalMetric,
    pub target: u32,
}

impl Goal {
    /// Validate a goal; the target must be positive.
    pub fn new(
        user_id: UserId,
        period: GoalPeriod,
        metric: GoalMetric,
        target: u32,
    ) -> Result<Self, GoalValidationError> {
        if target == 0 {
            return Err(GoalValidationError::ZeroTarget);
        }
        Ok(Self {
            user_id,
            period,
            metric,
            target,
        })
    }

    /// Combine the goal with window totals.
    pub fn progress(&self, window_sales: u64, window_points: u64) -> GoalProgress {
        let current = match self.metric {
            GoalMetric::Sales => window_sales,
            GoalMetric::Points => window_points,
        };
        GoalProgress {
            period: self.period,
            metric: self.metric,
            target: self.target,
            current,
            completed: current >= u64::from(self.target),
        }
    }
}

/// Goal with its current progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub period: GoalPeriod,
    pub metric: GoalMetric,
    pub target: u32,
    pub current: u64,
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn zero_target_is_rejected() {
        let result = Goal::new(UserId::random(), GoalPeriod::Daily, GoalMetric::Sales, 0);
        assert_eq!(result, Err(GoalValidationError::ZeroTarget));
    }

    #[rstest]
    #[case(GoalMetric::Sales, 5, true)]
    #[case(GoalMetric::Points, 5, false)]
    fn progress_reads_the_metric(
        #[case] metric: GoalMetric,
        #[case] target: u32,
        #[case] completed: bool,
    ) {
        let goal = Goal::new(UserId::random(), GoalPeriod::Weekly, metric, target).expect("valid goal");
        let progress = goal.progress(5, 4);
        assert_eq!(progress.completed, completed);
    }

    #[rstest]
    #[case(GoalPeriod::Daily, TimeRange::Today)]
    #[case(GoalPeriod::Weekly, TimeRange::Week)]
    #[case(GoalPeriod::Monthly, TimeRange::Month)]
    fn periods_map_to_windows(#[case] period: GoalPeriod, #[case] range: TimeRange) {
        assert_eq!(period.time_range(), range);
    }
}
