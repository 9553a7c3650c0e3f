//! PostgreSQL-backed leaderboard aggregation.
//!
//! Window points are the sum of `points_awarded` on non-cancelled orders
//! created inside the window plus the rewards of achievements earned inside
//! it. Aggregation happens in SQL so a read is a single round trip.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Nullable, Timestamptz, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LeaderboardRepository, LeaderboardRepositoryError, WindowTotals};
use crate::domain::{LeaderboardRow, StreakState, Team, TeamId, TimeWindow, UserId};

use super::error_mapping::{column_u32, column_u64, port_error_mapping};
use super::models::{LeaderboardAggregateRow, TeamRow, WindowTotalsRow};
use super::pool::DbPool;
use super::schema::teams;

/// Diesel-backed implementation of the `LeaderboardRepository` port.
#[derive(Clone)]
pub struct DieselLeaderboardRepository {
    pool: DbPool,
}

impl DieselLeaderboardRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

port_error_mapping!(LeaderboardRepositoryError, "leaderboard aggregation");

/// `$1` is the inclusive window start (NULL for all time), `$2` the
/// exclusive end.
const WINDOW_ROWS_SQL: &str = r#"
WITH order_totals AS (
    SELECT salesperson_id AS user_id,
           COUNT(*)::BIGINT AS order_count,
           COALESCE(SUM(points_awarded), 0)::BIGINT AS order_points
    FROM orders
    WHERE status <> 'cancelled'
      AND ($1::timestamptz IS NULL OR created_at >= $1)
      AND created_at < $2
    GROUP BY salesperson_id
),
bonus_totals AS (
    SELECT ua.user_id,
           COALESCE(SUM(ad.points_reward), 0)::BIGINT AS bonus_points
    FROM user_achievements ua
    JOIN achievement_definitions ad ON ad.id = ua.achievement_id
    WHERE ($1::timestamptz IS NULL OR ua.earned_at >= $1)
      AND ua.earned_at < $2
    GROUP BY ua.user_id
)
SELECT u.id AS user_id,
       u.display_name,
       u.team_id,
       u.created_at,
       (COALESCE(o.order_points, 0) + COALESCE(b.bonus_points, 0))::BIGINT AS window_points,
       COALESCE(o.order_count, 0)::BIGINT AS order_count,
       COALESCE(s.current_streak, 0) AS current_streak,
       COALESCE(s.longest_streak, 0) AS longest_streak,
       s.last_sale_date
FROM users u
LEFT JOIN order_totals o ON o.user_id = u.id
LEFT JOIN bonus_totals b ON b.user_id = u.id
LEFT JOIN user_stats s ON s.user_id = u.id
"#;

/// `$1` user, `$2` window start (nullable), `$3` window end.
const USER_TOTALS_SQL: &str = r#"
SELECT
    (SELECT COUNT(*)
       FROM orders
      WHERE salesperson_id = $1
        AND status <> 'cancelled'
        AND ($2::timestamptz IS NULL OR created_at >= $2)
        AND created_at < $3)::BIGINT AS sales,
    ((SELECT COALESCE(SUM(points_awarded), 0)
        FROM orders
       WHERE salesperson_id = $1
         AND status <> 'cancelled'
         AND ($2::timestamptz IS NULL OR created_at >= $2)
         AND created_at < $3)
     + (SELECT COALESCE(SUM(ad.points_reward), 0)
          FROM user_achievements ua
          JOIN achievement_definitions ad ON ad.id = ua.achievement_id
         WHERE ua.user_id = $1
           AND ($2::timestamptz IS NULL OR ua.earned_at >= $2)
           AND ua.earned_at < $3))::BIGINT AS points
"#;

fn aggregate_to_row(row: LeaderboardAggregateRow) -> LeaderboardRow {
    LeaderboardRow {
        user_id: UserId::from_uuid(row.user_id),
        display_name: row.display_name,
        team_id: row.team_id.map(TeamId::from_uuid),
        account_created_at: row.created_at,
        window_points: column_u64(row.window_points),
        order_count: column_u64(row.order_count),
        streak: StreakState {
            current: column_u32(row.current_streak),
            longest: column_u32(row.longest_streak),
            last_sale_day: row.last_sale_date,
        },
    }
}

#[async_trait]
impl LeaderboardRepository for DieselLeaderboardRepository {
    async fn window_rows(
        &self,
        window: &TimeWindow,
    ) -> Result<Vec<LeaderboardRow>, LeaderboardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LeaderboardAggregateRow> = sql_query(WINDOW_ROWS_SQL)
            .bind::<Nullable<Timestamptz>, _>(window.start)
            .bind::<Timestamptz, _>(window.end)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(aggregate_to_row).collect())
    }

    async fn user_totals(
        &self,
        user_id: &UserId,
        window: &TimeWindow,
    ) -> Result<WindowTotals, LeaderboardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: WindowTotalsRow = sql_query(USER_TOTALS_SQL)
            .bind::<SqlUuid, _>(*user_id.as_uuid())
            .bind::<Nullable<Timestamptz>, _>(window.start)
            .bind::<Timestamptz, _>(window.end)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(WindowTotals {
            sales: column_u64(row.sales),
            points: column_u64(row.points),
        })
    }

    async fn teams(&self) -> Result<Vec<Team>, LeaderboardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TeamRow> = teams::table
            .select(TeamRow::as_select())
            .order_by(teams::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| Team {
                id: TeamId::from_uuid(row.id),
                name: row.name,
            })
            .collect())
    }
}
