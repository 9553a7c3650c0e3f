//! Shared world for service-level integration tests.
//!
//! Wires the real domain services over one [`InMemoryStore`] and a settable
//! clock, the same way the server wires them over PostgreSQL.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use fieldsales::domain::ports::{OrderCommand, OrderCreated};
use fieldsales::domain::{
    AchievementCategory, AchievementCondition, AchievementDefinition, AchievementId,
    AchievementsService, AuthenticatedUser, BusinessCalendar, CommissionService, GoalsService,
    LeaderboardService, OrderDraft, OrderService, PlanType, RewardsService, SaleType, SalesUser,
    TeamId, UserId, UserRole,
};
use fieldsales::inbound::http::state::HttpState;
use fieldsales::test_support::{InMemoryStore, MutableClock};

pub type Leaderboard = LeaderboardService<InMemoryStore, InMemoryStore>;
pub type Rewards = RewardsService<InMemoryStore, InMemoryStore, InMemoryStore, Leaderboard>;
pub type Orders = OrderService<InMemoryStore, InMemoryStore, Rewards>;
pub type Goals = GoalsService<InMemoryStore, InMemoryStore>;

/// Wednesday 4 March 2026, midday UTC.
pub fn midweek() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 4, 12, 0, 0)
        .single()
        .expect("valid instant")
}

pub struct World {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub orders: Arc<Orders>,
    pub leaderboard: Arc<Leaderboard>,
    pub achievements: Arc<AchievementsService<InMemoryStore>>,
    pub goals: Arc<Goals>,
}

impl World {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(midweek()));
        let calendar = BusinessCalendar::utc();

        let leaderboard = Arc::new(LeaderboardService::new(
            store.clone(),
            store.clone(),
            clock.clone(),
            calendar,
        ));
        let rewards = RewardsService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            leaderboard.clone(),
            clock.clone(),
            calendar,
        );
        let orders = Arc::new(OrderService::new(
            store.clone(),
            store.clone(),
            Arc::new(rewards),
            clock.clone(),
        ));
        let goals = Arc::new(GoalsService::new(
            store.clone(),
            store.clone(),
            clock.clone(),
            calendar,
        ));
        let achievements = Arc::new(AchievementsService::new(store.clone()));

        Self {
            store,
            clock,
            orders,
            leaderboard,
            achievements,
            goals,
        }
    }

    /// Register a salesperson whose account was created `days_ago` before
    /// the current clock.
    pub fn salesperson(
        &self,
        name: &str,
        team_id: Option<TeamId>,
        days_ago: i64,
    ) -> AuthenticatedUser {
        self.user_with_role(name, team_id, days_ago, UserRole::Salesperson)
    }

    pub fn user_with_role(
        &self,
        name: &str,
        team_id: Option<TeamId>,
        days_ago: i64,
        role: UserRole,
    ) -> AuthenticatedUser {
        let created_at = midweek() - chrono::TimeDelta::days(days_ago);
        self.store.add_user(
            SalesUser {
                id: UserId::random(),
                display_name: name.to_owned(),
                team_id,
                created_at,
            },
            role,
        )
    }

    /// Driving ports for the HTTP adapter, all backed by this world.
    pub fn http_state(&self) -> HttpState {
        HttpState {
            users: self.store.clone(),
            orders: self.orders.clone(),
            orders_query: self.orders.clone(),
            leaderboard: self.leaderboard.clone(),
            achievements: self.achievements.clone(),
            goals: self.goals.clone(),
            goals_query: self.goals.clone(),
            commission: Arc::new(CommissionService::new(self.store.clone())),
        }
    }

    /// Create an order for `user`, panicking if it cannot be stored.
    pub async fn sell(&self, user: &AuthenticatedUser, draft: OrderDraft) -> OrderCreated {
        self.orders
            .create_order(user, draft)
            .await
            .expect("order stored")
    }

    /// Add a definition to the catalogue and return its id.
    pub fn define(
        &self,
        name: &str,
        category: AchievementCategory,
        condition: AchievementCondition,
        points_reward: u32,
    ) -> AchievementId {
        let id = AchievementId::random();
        self.store.add_definition(AchievementDefinition {
            id,
            name: name.to_owned(),
            description: format!("{name} description"),
            category,
            condition,
            points_reward,
            is_secret: false,
        });
        id
    }
}

/// Draft for a sale worth `10 + 5 * add_ons` points.
pub fn standard_sale(add_ons: u32) -> OrderDraft {
    OrderDraft::new(
        "Jordan Lee",
        "12 Harbour Road",
        PlanType::Standard300,
        SaleType::Standard,
        add_ons,
    )
    .expect("valid draft")
}

pub fn upgrade_sale() -> OrderDraft {
    OrderDraft::new(
        "Sam Patel",
        "4 Mill Lane",
        PlanType::Premium500,
        SaleType::Upgrade,
        0,
    )
    .expect("valid draft")
}
