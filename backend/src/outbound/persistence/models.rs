//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Integer, Nullable, Timestamptz, Uuid as SqlUuid, Varchar};
use uuid::Uuid;

use super::schema::{
    achievement_definitions, commission_rates, orders, rank_snapshots, role_commission_rates,
    teams, user_achievements, user_goals, user_stats, users,
};

/// Identity columns of the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserIdentityRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TeamRow {
    pub id: Uuid,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Row struct for reading from the orders table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub salesperson_id: Uuid,
    pub customer_name: String,
    pub customer_address: String,
    pub plan_type: String,
    pub sale_type: String,
    pub add_ons_count: i32,
    pub status: String,
    pub commission_cents: i64,
    pub points_awarded: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new orders.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub id: Uuid,
    pub salesperson_id: Uuid,
    pub customer_name: &'a str,
    pub customer_address: &'a str,
    pub plan_type: &'a str,
    pub sale_type: &'a str,
    pub add_ons_count: i32,
    pub status: &'a str,
    pub commission_cents: i64,
    pub points_awarded: Option<i32>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Row struct for the user_stats table; also used for upserts.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = user_stats)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserStatsRow {
    pub user_id: Uuid,
    pub total_points: i64,
    pub lifetime_points: i64,
    pub total_sales: i64,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_sale_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Achievements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = achievement_definitions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AchievementDefinitionRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub condition_type: String,
    pub condition_value: i32,
    pub condition_key: Option<String>,
    pub points_reward: i32,
    pub is_secret: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_achievements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserAchievementRow {
    pub achievement_id: Uuid,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_achievements)]
pub(crate) struct NewUserAchievementRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub achievement_id: Uuid,
    pub earned_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

/// One salesperson with window aggregates, read through `sql_query`.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct LeaderboardAggregateRow {
    #[diesel(sql_type = SqlUuid)]
    pub user_id: Uuid,
    #[diesel(sql_type = Varchar)]
    pub display_name: String,
    #[diesel(sql_type = Nullable<SqlUuid>)]
    pub team_id: Option<Uuid>,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = BigInt)]
    pub window_points: i64,
    #[diesel(sql_type = BigInt)]
    pub order_count: i64,
    #[diesel(sql_type = Integer)]
    pub current_streak: i32,
    #[diesel(sql_type = Integer)]
    pub longest_streak: i32,
    #[diesel(sql_type = Nullable<Date>)]
    pub last_sale_date: Option<NaiveDate>,
}

/// Window totals for a single user.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct WindowTotalsRow {
    #[diesel(sql_type = BigInt)]
    pub sales: i64,
    #[diesel(sql_type = BigInt)]
    pub points: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rank_snapshots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RankSnapshotRow {
    pub user_id: Uuid,
    pub rank: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rank_snapshots)]
pub(crate) struct NewRankSnapshotRow<'a> {
    pub time_range: &'a str,
    pub period_start: NaiveDate,
    pub user_id: Uuid,
    pub rank: i32,
}

// ---------------------------------------------------------------------------
// Goals and commission
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_goals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GoalRow {
    pub user_id: Uuid,
    pub period: String,
    pub metric: String,
    pub target: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_goals)]
pub(crate) struct NewGoalRow<'a> {
    pub user_id: Uuid,
    pub period: &'a str,
    pub metric: &'a str,
    pub target: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = commission_rates)]
pub(crate) struct NewCommissionRateRow<'a> {
    pub plan_type: &'a str,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = role_commission_rates)]
pub(crate) struct NewRoleCommissionRateRow<'a> {
    pub plan_type: &'a str,
    pub role: &'a str,
    pub amount_cents: i64,
}
