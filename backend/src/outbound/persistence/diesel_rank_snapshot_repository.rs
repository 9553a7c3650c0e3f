//! PostgreSQL-backed rank snapshots used for leaderboard rank deltas.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{RankSnapshot, RankSnapshotRepository, RankSnapshotRepositoryError};
use crate::domain::{TimeRange, UserId};

use super::error_mapping::{column_u32, db_i32, port_error_mapping};
use super::models::{NewRankSnapshotRow, RankSnapshotRow};
use super::pool::DbPool;
use super::schema::rank_snapshots;

/// Diesel-backed implementation of the `RankSnapshotRepository` port.
#[derive(Clone)]
pub struct DieselRankSnapshotRepository {
    pool: DbPool,
}

impl DieselRankSnapshotRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

port_error_mapping!(RankSnapshotRepositoryError, "rank snapshots");

#[async_trait]
impl RankSnapshotRepository for DieselRankSnapshotRepository {
    async fn load(
        &self,
        range: TimeRange,
        period_start: NaiveDate,
    ) -> Result<Vec<RankSnapshot>, RankSnapshotRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RankSnapshotRow> = rank_snapshots::table
            .filter(rank_snapshots::time_range.eq(range.as_str()))
            .filter(rank_snapshots::period_start.eq(period_start))
            .select(RankSnapshotRow::as_select())
            .order_by(rank_snapshots::rank.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| RankSnapshot {
                user_id: UserId::from_uuid(row.user_id),
                rank: column_u32(row.rank),
            })
            .collect())
    }

    async fn save(
        &self,
        range: TimeRange,
        period_start: NaiveDate,
        ranks: &[RankSnapshot],
    ) -> Result<(), RankSnapshotRepositoryError> {
        let rows: Vec<NewRankSnapshotRow<'_>> = ranks
            .iter()
            .map(|snapshot| NewRankSnapshotRow {
                time_range: range.as_str(),
                period_start,
                user_id: *snapshot.user_id.as_uuid(),
                rank: db_i32(snapshot.rank),
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::delete(
                    rank_snapshots::table
                        .filter(rank_snapshots::time_range.eq(range.as_str()))
                        .filter(rank_snapshots::period_start.eq(period_start)),
                )
                .execute(conn)
                .await?;
                if !rows.is_empty() {
                    diesel::insert_into(rank_snapshots::table)
                        .values(&rows)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
