//! Port for per-period rank snapshots used to show rank movement.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{TimeRange, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rank snapshot adapters.
    pub enum RankSnapshotRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => ServiceUnavailable: "rank snapshot connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError: "rank snapshot query failed: {message}",
    }
}

/// Rank held by a user at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankSnapshot {
    pub user_id: UserId,
    pub rank: u32,
}

/// Port for rank snapshots keyed by `(range, period_start)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RankSnapshotRepository: Send + Sync {
    /// Ranks saved for a period; empty when no snapshot exists.
    async fn load(
        &self,
        range: TimeRange,
        period_start: NaiveDate,
    ) -> Result<Vec<RankSnapshot>, RankSnapshotRepositoryError>;

    /// Replace the snapshot for a period.
    async fn save(
        &self,
        range: TimeRange,
        period_start: NaiveDate,
        ranks: &[RankSnapshot],
    ) -> Result<(), RankSnapshotRepositoryError>;
}

/// Fixture repository that never has a snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRankSnapshotRepository;

#[async_trait]
impl RankSnapshotRepository for FixtureRankSnapshotRepository {
    async fn load(
        &self,
        _range: TimeRange,
        _period_start: NaiveDate,
    ) -> Result<Vec<RankSnapshot>, RankSnapshotRepositoryError> {
        Ok(Vec::new())
    }

    async fn save(
        &self,
        _range: TimeRange,
        _period_start: NaiveDate,
        _ranks: &[RankSnapshot],
    ) -> Result<(), RankSnapshotRepositoryError> {
        Ok(())
    }
}
