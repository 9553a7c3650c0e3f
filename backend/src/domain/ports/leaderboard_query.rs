//! Driving port for leaderboard reads.

use async_trait::async_trait;

use crate::domain::{Error, LeaderboardResult, TeamStanding, TimeRange, UserId};

/// Domain use-case port for rankings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardQuery: Send + Sync {
    /// Ranked entries for `range`. Never fails: aggregation errors are
    /// reported through [`LeaderboardResult::error`].
    async fn leaderboard(
        &self,
        viewer: &UserId,
        range: TimeRange,
        limit: Option<usize>,
    ) -> LeaderboardResult;

    /// Teams ranked by member points in `range`.
    async fn team_standings(&self, range: TimeRange) -> Result<Vec<TeamStanding>, Error>;

    /// Current rank of `user` in `range`; `None` when off the board.
    async fn user_rank(&self, user: &UserId, range: TimeRange) -> Result<Option<u32>, Error>;
}

/// Fixture query with an empty board.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeaderboardQuery;

#[async_trait]
impl LeaderboardQuery for FixtureLeaderboardQuery {
    async fn leaderboard(
        &self,
        _viewer: &UserId,
        _range: TimeRange,
        _limit: Option<usize>,
    ) -> LeaderboardResult {
        LeaderboardResult::ok(Vec::new())
    }

    async fn team_standings(&self, _range: TimeRange) -> Result<Vec<TeamStanding>, Error> {
        Ok(Vec::new())
    }

    async fn user_rank(&self, _user: &UserId, _range: TimeRange) -> Result<Option<u32>, Error> {
        Ok(None)
    }
}
