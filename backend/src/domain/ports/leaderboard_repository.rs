//! Port for windowed leaderboard aggregates.

use async_trait::async_trait;

use crate::domain::{LeaderboardRow, Team, TimeWindow, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by leaderboard repository adapters.
    pub enum LeaderboardRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => ServiceUnavailable: "leaderboard repository connection failed: {message}",
        /// Aggregation query failed.
        Query { message: String } => InternalError: "leaderboard query failed: {message}",
    }
}

/// Sales and points of one user inside a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowTotals {
    pub sales: u64,
    pub points: u64,
}

/// Port for leaderboard aggregation.
///
/// Window points are the sum of `points_awarded` over non-cancelled orders
/// created in the window plus `points_reward` of achievements earned in it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// One row per salesperson with their totals inside `window`.
    async fn window_rows(
        &self,
        window: &TimeWindow,
    ) -> Result<Vec<LeaderboardRow>, LeaderboardRepositoryError>;

    /// Totals for a single user inside `window`.
    async fn user_totals(
        &self,
        user_id: &UserId,
        window: &TimeWindow,
    ) -> Result<WindowTotals, LeaderboardRepositoryError>;

    /// All teams.
    async fn teams(&self) -> Result<Vec<Team>, LeaderboardRepositoryError>;
}

/// Fixture repository with an empty board.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeaderboardRepository;

#[async_trait]
impl LeaderboardRepository for FixtureLeaderboardRepository {
    async fn window_rows(
        &self,
        _window: &TimeWindow,
    ) -> Result<Vec<LeaderboardRow>, LeaderboardRepositoryError> {
        Ok(Vec::new())
    }

    async fn user_totals(
        &self,
        _user_id: &UserId,
        _window: &TimeWindow,
    ) -> Result<WindowTotals, LeaderboardRepositoryError> {
        Ok(WindowTotals::default())
    }

    async fn teams(&self) -> Result<Vec<Team>, LeaderboardRepositoryError> {
        Ok(Vec::new())
    }
}
