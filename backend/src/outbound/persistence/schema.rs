//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Sales teams.
    teams (id) {
        id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Accounts known to the identity provider.
    ///
    /// `role` holds `salesperson`, `manager` or `admin`.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        display_name -> Varchar,
        role -> Varchar,
        team_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Customer orders captured in the field.
    orders (id) {
        id -> Uuid,
        salesperson_id -> Uuid,
        customer_name -> Varchar,
        customer_address -> Varchar,
        plan_type -> Varchar,
        sale_type -> Varchar,
        add_ons_count -> Int4,
        status -> Varchar,
        commission_cents -> Int8,
        /// Null until the rewards engine claims the order.
        points_awarded -> Nullable<Int4>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reward counters, one row per salesperson.
    user_stats (user_id) {
        user_id -> Uuid,
        total_points -> Int8,
        lifetime_points -> Int8,
        total_sales -> Int8,
        current_streak -> Int4,
        longest_streak -> Int4,
        last_sale_date -> Nullable<Date>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Achievement reference data.
    ///
    /// The condition is stored flat: `condition_type` is one of
    /// `sales_count`, `sales_streak`, `points_total` or `custom`; custom
    /// conditions name their rule in `condition_key`.
    achievement_definitions (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        category -> Varchar,
        condition_type -> Varchar,
        condition_value -> Int4,
        condition_key -> Nullable<Varchar>,
        points_reward -> Int4,
        is_secret -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Unlocked achievements. Unique on `(user_id, achievement_id)`.
    user_achievements (id) {
        id -> Uuid,
        user_id -> Uuid,
        achievement_id -> Uuid,
        earned_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ranks captured at the last leaderboard read of a period.
    rank_snapshots (time_range, period_start, user_id) {
        time_range -> Varchar,
        period_start -> Date,
        user_id -> Uuid,
        rank -> Int4,
        captured_at -> Timestamptz,
    }
}

diesel::table! {
    /// Personal goals, one per `(user, period, metric)`.
    user_goals (user_id, period, metric) {
        user_id -> Uuid,
        period -> Varchar,
        metric -> Varchar,
        target -> Int4,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Base commission per plan type.
    commission_rates (plan_type) {
        plan_type -> Varchar,
        amount_cents -> Int8,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Role-specific commission overriding the base rate.
    role_commission_rates (plan_type, role) {
        plan_type -> Varchar,
        role -> Varchar,
        amount_cents -> Int8,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(users -> teams (team_id));
diesel::joinable!(orders -> users (salesperson_id));
diesel::joinable!(user_stats -> users (user_id));
diesel::joinable!(user_achievements -> users (user_id));
diesel::joinable!(user_achievements -> achievement_definitions (achievement_id));
diesel::joinable!(user_goals -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    teams,
    users,
    orders,
    user_stats,
    achievement_definitions,
    user_achievements,
    rank_snapshots,
    user_goals,
    commission_rates,
    role_commission_rates,
);
