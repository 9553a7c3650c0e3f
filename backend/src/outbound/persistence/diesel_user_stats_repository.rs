//! PostgreSQL-backed `UserStatsRepository`.
//!
//! `record_sale` claims the order and mutates the counters in one
//! transaction. The stats row is locked with `SELECT ... FOR UPDATE`, so
//! concurrent sales by the same salesperson are applied one after the other
//! and the streak never reads a stale `last_sale_date`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{SaleRecord, UserStatsRepository, UserStatsRepositoryError};
use crate::domain::{OrderStatus, SaleApplication, StreakState, UserId, UserStats};

use super::error_mapping::{column_u32, column_u64, db_i32, db_i64, port_error_mapping};
use super::models::UserStatsRow;
use super::pool::DbPool;
use super::schema::{orders, user_stats};

/// Diesel-backed implementation of the `UserStatsRepository` port.
#[derive(Clone)]
pub struct DieselUserStatsRepository {
    pool: DbPool,
}

impl DieselUserStatsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

port_error_mapping!(UserStatsRepositoryError, "user stats");

/// Result of the claim-and-apply transaction.
enum RecordOutcome {
    Applied(SaleApplication),
    AlreadyAwarded,
    NotAwardable,
}

fn row_to_stats(row: UserStatsRow) -> UserStats {
    UserStats {
        user_id: UserId::from_uuid(row.user_id),
        total_points: column_u64(row.total_points),
        lifetime_points: column_u64(row.lifetime_points),
        total_sales: column_u64(row.total_sales),
        streak: StreakState {
            current: column_u32(row.current_streak),
            longest: column_u32(row.longest_streak),
            last_sale_day: row.last_sale_date,
        },
    }
}

fn stats_to_row(stats: &UserStats) -> UserStatsRow {
    UserStatsRow {
        user_id: *stats.user_id.as_uuid(),
        total_points: db_i64(stats.total_points),
        lifetime_points: db_i64(stats.lifetime_points),
        total_sales: db_i64(stats.total_sales),
        current_streak: db_i32(stats.streak.current),
        longest_streak: db_i32(stats.streak.longest),
        last_sale_date: stats.streak.last_sale_day,
    }
}

/// Lock the stats row, creating an empty one first when absent.
async fn lock_stats(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
) -> Result<UserStatsRow, diesel::result::Error> {
    diesel::insert_into(user_stats::table)
        .values(&stats_to_row(&UserStats::empty(UserId::from_uuid(user_id))))
        .on_conflict(user_stats::user_id)
        .do_nothing()
        .execute(conn)
        .await?;

    user_stats::table
        .filter(user_stats::user_id.eq(user_id))
        .select(UserStatsRow::as_select())
        .for_update()
        .first(conn)
        .await
}

/// Explain why the claim matched no row.
async fn unclaimed_reason(
    conn: &mut AsyncPgConnection,
    order_id: Uuid,
) -> Result<RecordOutcome, diesel::result::Error> {
    let awarded: Option<Option<i32>> = orders::table
        .filter(orders::id.eq(order_id))
        .select(orders::points_awarded)
        .first(conn)
        .await
        .optional()?;
    Ok(match awarded {
        Some(Some(_)) => RecordOutcome::AlreadyAwarded,
        _ => RecordOutcome::NotAwardable,
    })
}

#[async_trait]
impl UserStatsRepository for DieselUserStatsRepository {
    async fn record_sale(
        &self,
        sale: &SaleRecord,
    ) -> Result<SaleApplication, UserStatsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let order_id = *sale.order_id.as_uuid();
        let user_id = *sale.user_id.as_uuid();
        let points = sale.points;
        let sale_day = sale.sale_day;

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let claimed = diesel::update(orders::table)
                        .filter(orders::id.eq(order_id))
                        .filter(orders::points_awarded.is_null())
                        .filter(orders::status.ne(OrderStatus::Cancelled.as_str()))
                        .set(orders::points_awarded.eq(db_i32(points)))
                        .execute(conn)
                        .await?;
                    if claimed == 0 {
                        return unclaimed_reason(conn, order_id).await;
                    }

                    let current = row_to_stats(lock_stats(conn, user_id).await?);
                    let application = current.apply_sale(points, sale_day);
                    diesel::update(user_stats::table.filter(user_stats::user_id.eq(user_id)))
                        .set((
                            &stats_to_row(&application.after),
                            user_stats::updated_at.eq(diesel::dsl::now),
                        ))
                        .execute(conn)
                        .await?;
                    Ok(RecordOutcome::Applied(application))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match outcome {
            RecordOutcome::Applied(application) => Ok(application),
            RecordOutcome::AlreadyAwarded => Err(UserStatsRepositoryError::already_awarded(
                sale.order_id.to_string(),
            )),
            RecordOutcome::NotAwardable => Err(UserStatsRepositoryError::not_awardable(
                sale.order_id.to_string(),
            )),
        }
    }

    async fn add_bonus_points(
        &self,
        user_id: &UserId,
        points: u32,
    ) -> Result<(), UserStatsRepositoryError> {
        if points == 0 {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let bonus = i64::from(points);
        let seed = UserStats::empty(user_id.clone()).with_bonus(points);
        diesel::insert_into(user_stats::table)
            .values(&stats_to_row(&seed))
            .on_conflict(user_stats::user_id)
            .do_update()
            .set((
                user_stats::total_points.eq(user_stats::total_points + bonus),
                user_stats::lifetime_points.eq(user_stats::lifetime_points + bonus),
                user_stats::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
