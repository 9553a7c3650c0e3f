//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see driving
//! ports, so they stay testable without a datastore.

use std::sync::Arc;

use crate::domain::ports::{
    AchievementsQuery, CommissionCommand, GoalsCommand, GoalsQuery, LeaderboardQuery,
    OrderCommand, OrderQuery, UserDirectory,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use fieldsales::domain::ports::{
///     FixtureAchievementsQuery, FixtureCommissionCommand, FixtureGoalsCommand,
///     FixtureGoalsQuery, FixtureLeaderboardQuery, FixtureOrderCommand, FixtureOrderQuery,
///     FixtureUserDirectory,
/// };
/// use fieldsales::inbound::http::state::HttpState;
///
/// let state = HttpState {
///     users: Arc::new(FixtureUserDirectory),
///     orders: Arc::new(FixtureOrderCommand),
///     orders_query: Arc::new(FixtureOrderQuery),
///     leaderboard: Arc::new(FixtureLeaderboardQuery),
///     achievements: Arc::new(FixtureAchievementsQuery),
///     goals: Arc::new(FixtureGoalsCommand),
///     goals_query: Arc::new(FixtureGoalsQuery),
///     commission: Arc::new(FixtureCommissionCommand),
/// };
/// let _orders = state.orders.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserDirectory>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
    pub leaderboard: Arc<dyn LeaderboardQuery>,
    pub achievements: Arc<dyn AchievementsQuery>,
    pub goals: Arc<dyn GoalsCommand>,
    pub goals_query: Arc<dyn GoalsQuery>,
    pub commission: Arc<dyn CommissionCommand>,
}
