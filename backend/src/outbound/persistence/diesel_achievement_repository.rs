//! PostgreSQL-backed achievement definitions and unlocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{AchievementRepository, AchievementRepositoryError};
use crate::domain::{
    AchievementCondition, AchievementDefinition, AchievementId, ConditionDecodeError,
    UserAchievement, UserId,
};

use super::error_mapping::{column_u32, port_error_mapping};
use super::models::{AchievementDefinitionRow, NewUserAchievementRow, UserAchievementRow};
use super::pool::DbPool;
use super::schema::{achievement_definitions, user_achievements};

/// Diesel-backed implementation of the `AchievementRepository` port.
#[derive(Clone)]
pub struct DieselAchievementRepository {
    pool: DbPool,
}

impl DieselAchievementRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

port_error_mapping!(AchievementRepositoryError, "achievements");

fn row_to_definition(
    row: AchievementDefinitionRow,
) -> Result<AchievementDefinition, ConditionDecodeError> {
    let condition = AchievementCondition::decode(
        &row.condition_type,
        row.condition_value,
        row.condition_key.as_deref(),
    )?;
    Ok(AchievementDefinition {
        id: AchievementId::from_uuid(row.id),
        category: row.category.parse()?,
        condition,
        points_reward: column_u32(row.points_reward),
        is_secret: row.is_secret,
        name: row.name,
        description: row.description,
    })
}

/// Decode rows, dropping the ones this build cannot evaluate.
fn decodable_definitions(rows: Vec<AchievementDefinitionRow>) -> Vec<AchievementDefinition> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            row_to_definition(row)
                .inspect_err(|err| {
                    warn!(achievement_id = %id, error = %err, "skipping achievement definition");
                })
                .ok()
        })
        .collect()
}

#[async_trait]
impl AchievementRepository for DieselAchievementRepository {
    async fn definitions(&self) -> Result<Vec<AchievementDefinition>, AchievementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AchievementDefinitionRow> = achievement_definitions::table
            .select(AchievementDefinitionRow::as_select())
            .order_by((
                achievement_definitions::created_at.asc(),
                achievement_definitions::id.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(decodable_definitions(rows))
    }

    async fn unlocked_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserAchievement>, AchievementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserAchievementRow> = user_achievements::table
            .filter(user_achievements::user_id.eq(user_id.as_uuid()))
            .select(UserAchievementRow::as_select())
            .order_by(user_achievements::earned_at.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| UserAchievement {
                achievement_id: AchievementId::from_uuid(row.achievement_id),
                earned_at: row.earned_at,
            })
            .collect())
    }

    async fn insert_unlock(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
        earned_at: DateTime<Utc>,
    ) -> Result<bool, AchievementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(user_achievements::table)
            .values(&NewUserAchievementRow {
                id: Uuid::new_v4(),
                user_id: *user_id.as_uuid(),
                achievement_id: *achievement_id.as_uuid(),
                earned_at,
            })
            .on_conflict((user_achievements::user_id, user_achievements::achievement_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted == 1)
    }
}
