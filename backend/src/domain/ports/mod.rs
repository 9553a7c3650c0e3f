//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`UserDirectory`]) are implemented by
//! outbound adapters. Driving ports (`*Command`, `*Query`,
//! [`RewardsEngine`]) are implemented by domain services and consumed by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod achievement_repository;
mod achievements_query;
mod commission_command;
mod commission_rate_repository;
mod goal_repository;
mod goals_command;
mod goals_query;
mod leaderboard_query;
mod leaderboard_repository;
mod order_command;
mod order_query;
mod order_repository;
mod rank_snapshot_repository;
mod rewards_engine;
mod user_directory;
mod user_stats_repository;

#[cfg(test)]
pub use achievement_repository::MockAchievementRepository;
pub use achievement_repository::{
    AchievementRepository, AchievementRepositoryError, FixtureAchievementRepository,
};
#[cfg(test)]
pub use achievements_query::MockAchievementsQuery;
pub use achievements_query::{AchievementsQuery, FixtureAchievementsQuery};
#[cfg(test)]
pub use commission_command::MockCommissionCommand;
pub use commission_command::{CommissionCommand, FixtureCommissionCommand};
#[cfg(test)]
pub use commission_rate_repository::MockCommissionRateRepository;
pub use commission_rate_repository::{
    CommissionRateRepository, CommissionRateRepositoryError, FixtureCommissionRateRepository,
};
#[cfg(test)]
pub use goal_repository::MockGoalRepository;
pub use goal_repository::{FixtureGoalRepository, GoalRepository, GoalRepositoryError};
#[cfg(test)]
pub use goals_command::MockGoalsCommand;
pub use goals_command::{FixtureGoalsCommand, GoalsCommand};
#[cfg(test)]
pub use goals_query::MockGoalsQuery;
pub use goals_query::{FixtureGoalsQuery, GoalsQuery};
#[cfg(test)]
pub use leaderboard_query::MockLeaderboardQuery;
pub use leaderboard_query::{FixtureLeaderboardQuery, LeaderboardQuery};
#[cfg(test)]
pub use leaderboard_repository::MockLeaderboardRepository;
pub use leaderboard_repository::{
    FixtureLeaderboardRepository, LeaderboardRepository, LeaderboardRepositoryError,
    WindowTotals,
};
#[cfg(test)]
pub use order_command::MockOrderCommand;
pub use order_command::{FixtureOrderCommand, OrderCommand, OrderCreated};
#[cfg(test)]
pub use order_query::MockOrderQuery;
pub use order_query::{FixtureOrderQuery, OrderQuery, OrderScope};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{FixtureOrderRepository, OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use rank_snapshot_repository::MockRankSnapshotRepository;
pub use rank_snapshot_repository::{
    FixtureRankSnapshotRepository, RankSnapshot, RankSnapshotRepository,
    RankSnapshotRepositoryError,
};
#[cfg(test)]
pub use rewards_engine::MockRewardsEngine;
pub use rewards_engine::{FixtureRewardsEngine, RewardsEngine};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
#[cfg(test)]
pub use user_stats_repository::MockUserStatsRepository;
pub use user_stats_repository::{
    FixtureUserStatsRepository, SaleRecord, UserStatsRepository, UserStatsRepositoryError,
};
