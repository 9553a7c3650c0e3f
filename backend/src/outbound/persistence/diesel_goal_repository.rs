//! PostgreSQL-backed personal goals.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{GoalRepository, GoalRepositoryError};
use crate::domain::{Goal, GoalValidationError, UserId};

use super::error_mapping::{column_u32, db_i32, port_error_mapping};
use super::models::{GoalRow, NewGoalRow};
use super::pool::DbPool;
use super::schema::user_goals;

/// Diesel-backed implementation of the `GoalRepository` port.
#[derive(Clone)]
pub struct DieselGoalRepository {
    pool: DbPool,
}

impl DieselGoalRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

port_error_mapping!(GoalRepositoryError, "goals");

fn row_to_goal(row: GoalRow) -> Result<Goal, GoalValidationError> {
    Goal::new(
        UserId::from_uuid(row.user_id),
        row.period.parse()?,
        row.metric.parse()?,
        column_u32(row.target),
    )
}

#[async_trait]
impl GoalRepository for DieselGoalRepository {
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Goal>, GoalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GoalRow> = user_goals::table
            .filter(user_goals::user_id.eq(user_id.as_uuid()))
            .select(GoalRow::as_select())
            .order_by((user_goals::period.asc(), user_goals::metric.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                row_to_goal(row)
                    .inspect_err(|err| warn!(%user_id, error = %err, "skipping stored goal"))
                    .ok()
            })
            .collect())
    }

    async fn upsert(&self, goal: &Goal) -> Result<(), GoalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(user_goals::table)
            .values(&NewGoalRow {
                user_id: *goal.user_id.as_uuid(),
                period: goal.period.as_str(),
                metric: goal.metric.as_str(),
                target: db_i32(goal.target),
            })
            .on_conflict((user_goals::user_id, user_goals::period, user_goals::metric))
            .do_update()
            .set((
                user_goals::target.eq(excluded(user_goals::target)),
                user_goals::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{GoalMetric, GoalPeriod};

    fn row(period: &str, metric: &str, target: i32) -> GoalRow {
        GoalRow {
            user_id: Uuid::new_v4(),
            period: period.to_owned(),
            metric: metric.to_owned(),
            target,
        }
    }

    #[rstest]
    fn maps_stored_goal() {
        let goal = row_to_goal(row("monthly", "points", 500)).expect("valid goal");
        assert_eq!(goal.period, GoalPeriod::Monthly);
        assert_eq!(goal.metric, GoalMetric::Points);
        assert_eq!(goal.target, 500);
    }

    #[rstest]
    #[case(row("yearly", "sales", 5))]
    #[case(row("daily", "revenue", 5))]
    #[case(row("daily", "sales", 0))]
    #[case(row("daily", "sales", -2))]
    fn rejects_invalid_rows(#[case] stored: GoalRow) {
        assert!(row_to_goal(stored).is_err());
    }
}
