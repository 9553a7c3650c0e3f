//! Builders wiring outbound adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use fieldsales::domain::ports::{
    AchievementRepository, CommissionRateRepository, FixtureAchievementsQuery,
    FixtureCommissionCommand, FixtureGoalsCommand, FixtureGoalsQuery, FixtureLeaderboardQuery,
    FixtureOrderCommand, FixtureOrderQuery, FixtureUserDirectory, GoalRepository, GoalsCommand,
    GoalsQuery, LeaderboardRepository, OrderCommand, OrderQuery, OrderRepository,
    RankSnapshotRepository, UserDirectory, UserStatsRepository,
};
use fieldsales::domain::{
    AchievementsService, BusinessCalendar, CommissionService, GoalsService, LeaderboardService,
    OrderService, RewardsService, TimeRange,
};
use fieldsales::inbound::http::state::HttpState;
use fieldsales::outbound::persistence::{
    DbPool, DieselAchievementRepository, DieselCommissionRateRepository, DieselGoalRepository,
    DieselLeaderboardRepository, DieselOrderRepository, DieselRankSnapshotRepository,
    DieselUserDirectory, DieselUserStatsRepository,
};

use super::ServerConfig;

/// Driven ports shared by the domain services.
struct Stores<O, S, A, L, R, G, C> {
    orders: Arc<O>,
    stats: Arc<S>,
    achievements: Arc<A>,
    leaderboard: Arc<L>,
    snapshots: Arc<R>,
    goals: Arc<G>,
    rates: Arc<C>,
}

impl
    Stores<
        DieselOrderRepository,
        DieselUserStatsRepository,
        DieselAchievementRepository,
        DieselLeaderboardRepository,
        DieselRankSnapshotRepository,
        DieselGoalRepository,
        DieselCommissionRateRepository,
    >
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            orders: Arc::new(DieselOrderRepository::new(pool.clone())),
            stats: Arc::new(DieselUserStatsRepository::new(pool.clone())),
            achievements: Arc::new(DieselAchievementRepository::new(pool.clone())),
            leaderboard: Arc::new(DieselLeaderboardRepository::new(pool.clone())),
            snapshots: Arc::new(DieselRankSnapshotRepository::new(pool.clone())),
            goals: Arc::new(DieselGoalRepository::new(pool.clone())),
            rates: Arc::new(DieselCommissionRateRepository::new(pool.clone())),
        }
    }
}

/// Time and calendar settings shared by every service.
struct ServiceContext {
    clock: Arc<dyn Clock>,
    calendar: BusinessCalendar,
    rank_window: TimeRange,
}

/// Assemble the domain services over `stores` and expose their driving ports.
fn wire_services<O, S, A, L, R, G, C>(
    stores: Stores<O, S, A, L, R, G, C>,
    users: Arc<dyn UserDirectory>,
    context: ServiceContext,
) -> HttpState
where
    O: OrderRepository + 'static,
    S: UserStatsRepository + 'static,
    A: AchievementRepository + 'static,
    L: LeaderboardRepository + 'static,
    R: RankSnapshotRepository + 'static,
    G: GoalRepository + 'static,
    C: CommissionRateRepository + 'static,
{
    let ServiceContext {
        clock,
        calendar,
        rank_window,
    } = context;

    let leaderboard = Arc::new(LeaderboardService::new(
        stores.leaderboard.clone(),
        stores.snapshots,
        clock.clone(),
        calendar,
    ));
    let rewards = RewardsService::new(
        stores.stats,
        stores.achievements.clone(),
        stores.orders.clone(),
        leaderboard.clone(),
        clock.clone(),
        calendar,
    )
    .with_rank_range(rank_window);
    let orders = Arc::new(OrderService::new(
        stores.orders,
        stores.rates.clone(),
        Arc::new(rewards),
        clock.clone(),
    ));
    let goals = Arc::new(GoalsService::new(
        stores.goals,
        stores.leaderboard,
        clock,
        calendar,
    ));

    HttpState {
        users,
        orders: orders.clone() as Arc<dyn OrderCommand>,
        orders_query: orders as Arc<dyn OrderQuery>,
        leaderboard,
        achievements: Arc::new(AchievementsService::new(stores.achievements)),
        goals: goals.clone() as Arc<dyn GoalsCommand>,
        goals_query: goals as Arc<dyn GoalsQuery>,
        commission: Arc::new(CommissionService::new(stores.rates)),
    }
}

fn fixture_state() -> HttpState {
    HttpState {
        users: Arc::new(FixtureUserDirectory),
        orders: Arc::new(FixtureOrderCommand),
        orders_query: Arc::new(FixtureOrderQuery),
        leaderboard: Arc::new(FixtureLeaderboardQuery),
        achievements: Arc::new(FixtureAchievementsQuery),
        goals: Arc::new(FixtureGoalsCommand),
        goals_query: Arc::new(FixtureGoalsQuery),
        commission: Arc::new(FixtureCommissionCommand),
    }
}

/// Build HTTP state from the server configuration.
///
/// Uses the Diesel adapters when a pool is configured, otherwise every port
/// is a fixture.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => wire_services(
            Stores::diesel(pool),
            Arc::new(DieselUserDirectory::new(pool.clone())),
            ServiceContext {
                clock: Arc::new(DefaultClock),
                calendar: config.calendar,
                rank_window: config.rank_window,
            },
        ),
        None => fixture_state(),
    };
    web::Data::new(state)
}
