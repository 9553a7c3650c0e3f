//! Domain primitives, services and ports.
//!
//! Types here are transport agnostic. Inbound adapters translate requests
//! into these types and map [`Error`] onto their protocol; outbound adapters
//! implement the traits in [`ports`].

pub mod achievements;
pub mod calendar;
pub mod commission;
pub mod error;
pub mod goals;
pub mod leaderboard;
pub mod order;
pub mod points;
pub mod ports;
pub mod rewards;
pub mod stats;
pub mod streak;
pub mod trace_id;
pub mod user;

mod achievements_service;
mod commission_service;
mod goals_service;
mod leaderboard_service;
mod order_service;
mod rewards_service;

pub use self::achievements::{
    AchievementCategory, AchievementCondition, AchievementDefinition, AchievementId,
    AchievementView, ConditionDecodeError, CustomCondition, ProgressContext, UserAchievement,
    evaluate,
};
pub use self::achievements_service::AchievementsService;
pub use self::calendar::{BusinessCalendar, ParseTimeRangeError, TimeRange, TimeWindow};
pub use self::commission::{CommissionRateUpdate, CommissionRates, NegativeCommission};
pub use self::commission_service::{CommissionService, commission_for};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::goals::{Goal, GoalMetric, GoalPeriod, GoalProgress, GoalValidationError};
pub use self::goals_service::GoalsService;
pub use self::leaderboard::{
    Badge, DEFAULT_LEADERBOARD_LIMIT, EntryContext, LeaderboardEntry, LeaderboardResult,
    LeaderboardRow, MAX_LEADERBOARD_LIMIT, RankChange, Team, TeamStanding, build_entries,
    effective_limit, leading_team, rank_of, rank_rows, rank_teams,
};
pub use self::leaderboard_service::LeaderboardService;
pub use self::order::{
    MAX_ADD_ONS, MAX_CUSTOMER_ADDRESS_CHARS, MAX_CUSTOMER_NAME_CHARS, Order, OrderDraft, OrderId, OrderStatus, OrderValidationError,
    ParseOrderFieldError, PlanType, SaleType,
};
pub use self::order_service::OrderService;
pub use self::points::{ADD_ON_POINTS, PointBreakdown, calculate_points, sale_type_points};
pub use self::rewards::{
    OrderGamificationResult, PointsAward, StreakSummary, UnlockedAchievement,
};
pub use self::rewards_service::RewardsService;
pub use self::stats::{SaleApplication, UserStats};
pub use self::streak::{STREAK_MILESTONES, StreakState, StreakUpdate};
pub use self::trace_id::TraceId;
pub use self::user::{
    AuthenticatedUser, SalesUser, TeamId, UserId, UserRole, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use fieldsales::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("access denied"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
