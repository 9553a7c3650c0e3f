//! Test utilities for the fieldsales crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`):
//! a settable clock and an in-memory datastore implementing every driven
//! port with the same semantics as the PostgreSQL adapters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    AchievementRepository, AchievementRepositoryError, CommissionRateRepository,
    CommissionRateRepositoryError, GoalRepository, GoalRepositoryError, LeaderboardRepository,
    LeaderboardRepositoryError, OrderRepository, OrderRepositoryError, RankSnapshot,
    RankSnapshotRepository, RankSnapshotRepositoryError, SaleRecord, UserDirectory,
    UserDirectoryError, UserStatsRepository, UserStatsRepositoryError, WindowTotals,
};
use crate::domain::{
    AchievementDefinition, AchievementId, AuthenticatedUser, CommissionRateUpdate,
    CommissionRates, Goal, LeaderboardRow, Order, OrderId, OrderStatus, PlanType,
    SaleApplication, SalesUser, Team, TimeRange, TimeWindow, UserAchievement, UserId, UserRole,
    UserStats,
};

/// Clock whose current time is set by the test.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    pub fn advance_days(&self, days: i64) {
        *self.lock_clock() += TimeDelta::days(days);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

#[derive(Default)]
struct State {
    users: Vec<(SalesUser, AuthenticatedUser)>,
    teams: Vec<Team>,
    orders: Vec<Order>,
    stats: HashMap<UserId, UserStats>,
    definitions: Vec<AchievementDefinition>,
    unlocks: Vec<(UserId, UserAchievement)>,
    goals: Vec<Goal>,
    base_rates: HashMap<PlanType, i64>,
    role_rates: HashMap<(UserRole, PlanType), i64>,
    snapshots: HashMap<(TimeRange, NaiveDate), Vec<RankSnapshot>>,
}

/// In-memory datastore implementing every driven port.
///
/// A single mutex guards all tables, so each port call is atomic in the
/// same way a database transaction would be.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    fail_stats: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a salesperson and return their session identity.
    pub fn add_user(&self, profile: SalesUser, role: UserRole) -> AuthenticatedUser {
        let identity = AuthenticatedUser {
            id: profile.id.clone(),
            email: format!("{}@example.com", profile.display_name.to_lowercase()),
            role,
        };
        self.lock().users.push((profile, identity.clone()));
        identity
    }

    pub fn add_team(&self, team: Team) {
        self.lock().teams.push(team);
    }

    pub fn add_definition(&self, definition: AchievementDefinition) {
        self.lock().definitions.push(definition);
    }

    pub fn set_base_rate(&self, plan_type: PlanType, cents: i64) {
        self.lock().base_rates.insert(plan_type, cents);
    }

    /// Seed counters directly, as if earlier sales had been recorded.
    pub fn put_stats(&self, stats: UserStats) {
        self.lock().stats.insert(stats.user_id.clone(), stats);
    }

    /// Make every stats write fail with a connection error.
    pub fn fail_stats_writes(&self, fail: bool) {
        self.fail_stats.store(fail, Ordering::SeqCst);
    }

    pub fn orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    pub fn stats_of(&self, user_id: &UserId) -> Option<UserStats> {
        self.lock().stats.get(user_id).cloned()
    }

    /// Unlock rows stored for a user, in insertion order.
    pub fn unlocks_of(&self, user_id: &UserId) -> Vec<AchievementId> {
        self.lock()
            .unlocks
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, unlock)| unlock.achievement_id)
            .collect()
    }

    fn check_stats_available(&self) -> Result<(), UserStatsRepositoryError> {
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(UserStatsRepositoryError::connection("stats store offline"));
        }
        Ok(())
    }
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

fn totals_in(state: &State, user_id: &UserId, window: &TimeWindow) -> WindowTotals {
    let mut totals = WindowTotals::default();
    for order in state.orders.iter().filter(|order| {
        &order.salesperson_id == user_id && order.is_qualifying() && window.contains(order.created_at)
    }) {
        totals.sales += 1;
        totals.points += u64::from(order.points_awarded.unwrap_or(0));
    }
    for (_, unlock) in state
        .unlocks
        .iter()
        .filter(|(owner, unlock)| owner == user_id && window.contains(unlock.earned_at))
    {
        let reward = state
            .definitions
            .iter()
            .find(|definition| definition.id == unlock.achievement_id)
            .map_or(0, |definition| definition.points_reward);
        totals.points += u64::from(reward);
    }
    totals
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        self.lock().orders.push(order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(self.lock().orders.iter().find(|order| &order.id == id).cloned())
    }

    async fn list_for_salesperson(
        &self,
        salesperson_id: &UserId,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        let orders = self
            .lock()
            .orders
            .iter()
            .filter(|order| &order.salesperson_id == salesperson_id)
            .cloned()
            .collect();
        Ok(newest_first(orders))
    }

    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(newest_first(self.lock().orders.clone()))
    }

    async fn update_status(
        &self,
        id: &OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let mut state = self.lock();
        let Some(order) = state
            .orders
            .iter_mut()
            .find(|order| &order.id == id && order.status == expected)
        else {
            return Ok(None);
        };
        order.status = next;
        Ok(Some(order.clone()))
    }

    async fn count_qualifying(&self, salesperson_id: &UserId) -> Result<u64, OrderRepositoryError> {
        let count = self
            .lock()
            .orders
            .iter()
            .filter(|order| &order.salesperson_id == salesperson_id && order.is_qualifying())
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl UserStatsRepository for InMemoryStore {
    async fn record_sale(
        &self,
        sale: &SaleRecord,
    ) -> Result<SaleApplication, UserStatsRepositoryError> {
        self.check_stats_available()?;
        let mut state = self.lock();
        let order_id = sale.order_id.to_string();
        let order = state
            .orders
            .iter_mut()
            .find(|order| order.id == sale.order_id)
            .ok_or_else(|| UserStatsRepositoryError::not_awardable(order_id.clone()))?;
        if order.points_awarded.is_some() {
            return Err(UserStatsRepositoryError::already_awarded(order_id));
        }
        if !order.is_qualifying() {
            return Err(UserStatsRepositoryError::not_awardable(order_id));
        }
        order.points_awarded = Some(sale.points);

        let current = state
            .stats
            .get(&sale.user_id)
            .cloned()
            .unwrap_or_else(|| UserStats::empty(sale.user_id.clone()));
        let application = current.apply_sale(sale.points, sale.sale_day);
        state
            .stats
            .insert(sale.user_id.clone(), application.after.clone());
        Ok(application)
    }

    async fn add_bonus_points(
        &self,
        user_id: &UserId,
        points: u32,
    ) -> Result<(), UserStatsRepositoryError> {
        self.check_stats_available()?;
        let mut state = self.lock();
        let current = state
            .stats
            .remove(user_id)
            .unwrap_or_else(|| UserStats::empty(user_id.clone()));
        state.stats.insert(user_id.clone(), current.with_bonus(points));
        Ok(())
    }
}

#[async_trait]
impl AchievementRepository for InMemoryStore {
    async fn definitions(&self) -> Result<Vec<AchievementDefinition>, AchievementRepositoryError> {
        Ok(self.lock().definitions.clone())
    }

    async fn unlocked_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UserAchievement>, AchievementRepositoryError> {
        Ok(self
            .lock()
            .unlocks
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, unlock)| unlock.clone())
            .collect())
    }

    async fn insert_unlock(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
        earned_at: DateTime<Utc>,
    ) -> Result<bool, AchievementRepositoryError> {
        let mut state = self.lock();
        let exists = state
            .unlocks
            .iter()
            .any(|(owner, unlock)| owner == user_id && &unlock.achievement_id == achievement_id);
        if exists {
            return Ok(false);
        }
        state.unlocks.push((
            user_id.clone(),
            UserAchievement {
                achievement_id: *achievement_id,
                earned_at,
            },
        ));
        Ok(true)
    }
}

#[async_trait]
impl LeaderboardRepository for InMemoryStore {
    async fn window_rows(
        &self,
        window: &TimeWindow,
    ) -> Result<Vec<LeaderboardRow>, LeaderboardRepositoryError> {
        let state = self.lock();
        Ok(state
            .users
            .iter()
            .map(|(profile, _)| {
                let totals = totals_in(&state, &profile.id, window);
                LeaderboardRow {
                    user_id: profile.id.clone(),
                    display_name: profile.display_name.clone(),
                    team_id: profile.team_id,
                    account_created_at: profile.created_at,
                    window_points: totals.points,
                    order_count: totals.sales,
                    streak: state
                        .stats
                        .get(&profile.id)
                        .map(|stats| stats.streak)
                        .unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn user_totals(
        &self,
        user_id: &UserId,
        window: &TimeWindow,
    ) -> Result<WindowTotals, LeaderboardRepositoryError> {
        Ok(totals_in(&self.lock(), user_id, window))
    }

    async fn teams(&self) -> Result<Vec<Team>, LeaderboardRepositoryError> {
        Ok(self.lock().teams.clone())
    }
}

#[async_trait]
impl RankSnapshotRepository for InMemoryStore {
    async fn load(
        &self,
        range: TimeRange,
        period_start: NaiveDate,
    ) -> Result<Vec<RankSnapshot>, RankSnapshotRepositoryError> {
        Ok(self
            .lock()
            .snapshots
            .get(&(range, period_start))
            .cloned()
            .unwrap_or_default())
    }

    async fn save(
        &self,
        range: TimeRange,
        period_start: NaiveDate,
        ranks: &[RankSnapshot],
    ) -> Result<(), RankSnapshotRepositoryError> {
        self.lock()
            .snapshots
            .insert((range, period_start), ranks.to_vec());
        Ok(())
    }
}

#[async_trait]
impl GoalRepository for InMemoryStore {
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Goal>, GoalRepositoryError> {
        Ok(self
            .lock()
            .goals
            .iter()
            .filter(|goal| &goal.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert(&self, goal: &Goal) -> Result<(), GoalRepositoryError> {
        let mut state = self.lock();
        state.goals.retain(|existing| {
            !(existing.user_id == goal.user_id
                && existing.period == goal.period
                && existing.metric == goal.metric)
        });
        state.goals.push(goal.clone());
        Ok(())
    }
}

#[async_trait]
impl CommissionRateRepository for InMemoryStore {
    async fn rates_for(
        &self,
        plan_type: PlanType,
        role: UserRole,
    ) -> Result<CommissionRates, CommissionRateRepositoryError> {
        let state = self.lock();
        Ok(CommissionRates {
            base_cents: state.base_rates.get(&plan_type).copied(),
            role_override_cents: state.role_rates.get(&(role, plan_type)).copied(),
        })
    }

    async fn upsert(&self, update: &CommissionRateUpdate) -> Result<(), CommissionRateRepositoryError> {
        let mut state = self.lock();
        match update.role {
            Some(role) => {
                state
                    .role_rates
                    .insert((role, update.plan_type), update.amount_cents);
            }
            None => {
                state.base_rates.insert(update.plan_type, update.amount_cents);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_user(&self, id: &UserId) -> Result<Option<AuthenticatedUser>, UserDirectoryError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(profile, _)| &profile.id == id)
            .map(|(_, identity)| identity.clone()))
    }
}
