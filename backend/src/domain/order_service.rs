//! Order lifecycle services.
//!
//! Creation is two-phase: the order is committed first, then the rewards
//! engine runs as a separate step. A rewards failure never loses the order;
//! it is logged and reported next to it, and can be retried later.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::commission_service::commission_for;
use crate::domain::ports::{
    CommissionRateRepository, OrderCommand, OrderCreated, OrderQuery, OrderRepository,
    OrderScope, RewardsEngine,
};
use crate::domain::{
    AuthenticatedUser, Error, Order, OrderDraft, OrderGamificationResult, OrderId, OrderStatus,
};

fn access_denied() -> Error {
    Error::forbidden("access denied")
}

/// Service implementing the order driving ports.
#[derive(Clone)]
pub struct OrderService<O, C, R> {
    order_repo: Arc<O>,
    commission_repo: Arc<C>,
    rewards: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<O, C, R> OrderService<O, C, R> {
    pub fn new(
        order_repo: Arc<O>,
        commission_repo: Arc<C>,
        rewards: Arc<R>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            order_repo,
            commission_repo,
            rewards,
            clock,
        }
    }
}

impl<O, C, R> OrderService<O, C, R>
where
    O: OrderRepository,
    C: CommissionRateRepository,
    R: RewardsEngine,
{
    /// Load an order the user is allowed to act on.
    async fn accessible_order(
        &self,
        user: &AuthenticatedUser,
        order_id: &OrderId,
    ) -> Result<Order, Error> {
        let order = self
            .order_repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("order {order_id} not found")))?;
        if !user.may_act_for(&order.salesperson_id) {
            return Err(access_denied());
        }
        Ok(order)
    }
}

#[async_trait]
impl<O, C, R> OrderCommand for OrderService<O, C, R>
where
    O: OrderRepository,
    C: CommissionRateRepository,
    R: RewardsEngine,
{
    async fn create_order(
        &self,
        user: &AuthenticatedUser,
        draft: OrderDraft,
    ) -> Result<OrderCreated, Error> {
        let commission_cents =
            commission_for(self.commission_repo.as_ref(), draft.plan_type(), user.role).await?;
        let mut order = draft.into_order(user.id.clone(), commission_cents, self.clock.utc());

        self.order_repo
            .insert(&order)
            .await?;
        info!(order_id = %order.id, user_id = %user.id, plan_type = %order.plan_type, "order created");

        match self.rewards.award_order(&order).await {
            Ok(rewards) => {
                order.points_awarded = Some(rewards.points.total_points);
                Ok(OrderCreated {
                    order,
                    rewards: Some(rewards),
                    rewards_error: None,
                })
            }
            Err(error) => {
                warn!(
                    order_id = %order.id,
                    user_id = %user.id,
                    error = %error,
                    "rewards step failed; order kept without award"
                );
                Ok(OrderCreated {
                    order,
                    rewards: None,
                    rewards_error: Some(error.message().to_owned()),
                })
            }
        }
    }

    async fn update_status(
        &self,
        user: &AuthenticatedUser,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, Error> {
        let order = self.accessible_order(user, order_id).await?;
        if !order.status.can_transition_to(status) {
            return Err(Error::conflict(format!(
                "cannot move order from {} to {status}",
                order.status
            ))
            .with_details(json!({
                "from": order.status,
                "to": status,
                "code": "invalid_transition",
            })));
        }

        let updated = self
            .order_repo
            .update_status(order_id, order.status, status)
            .await?
            .ok_or_else(|| Error::conflict("order was modified concurrently"))?;
        info!(order_id = %order_id, from = %order.status, to = %status, "order status updated");
        Ok(updated)
    }

    async fn retry_rewards(
        &self,
        user: &AuthenticatedUser,
        order_id: &OrderId,
    ) -> Result<OrderGamificationResult, Error> {
        let order = self.accessible_order(user, order_id).await?;
        self.rewards.award_order(&order).await
    }
}

#[async_trait]
impl<O, C, R> OrderQuery for OrderService<O, C, R>
where
    O: OrderRepository,
    C: CommissionRateRepository,
    R: RewardsEngine,
{
    async fn list_orders(
        &self,
        user: &AuthenticatedUser,
        scope: OrderScope,
    ) -> Result<Vec<Order>, Error> {
        let orders = match scope {
            OrderScope::Mine => self.order_repo.list_for_salesperson(&user.id).await,
            OrderScope::All if user.role.can_manage_orders() => self.order_repo.list_all().await,
            OrderScope::All => return Err(access_denied()),
        };
        orders.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockCommissionRateRepository, MockOrderRepository, MockRewardsEngine,
        OrderRepositoryError,
    };
    use crate::domain::{
        CommissionRates, ErrorCode, PlanType, PointBreakdown, PointsAward, SaleType,
        StreakSummary, UserId, UserRole,
    };
    use crate::test_support::MutableClock;
    use chrono::{DateTime, Utc};
    use rstest::{fixture, rstest};

    type Service = OrderService<MockOrderRepository, MockCommissionRateRepository, MockRewardsEngine>;

    fn now() -> DateTime<Utc> {
        "2026-03-05T15:00:00Z".parse().expect("valid timestamp")
    }

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::random(),
            email: "rep@example.com".to_owned(),
            role,
        }
    }

    #[fixture]
    fn draft() -> OrderDraft {
        OrderDraft::new("Ada", "1 Main St", PlanType::Premium500, SaleType::Standard, 2)
            .expect("valid draft")
    }

    fn rates(base: i64) -> MockCommissionRateRepository {
        let mut repo = MockCommissionRateRepository::new();
        repo.expect_rates_for().returning(move |_, _| {
            Ok(CommissionRates {
                base_cents: Some(base),
                role_override_cents: None,
            })
        });
        repo
    }

    fn award() -> OrderGamificationResult {
        let breakdown = PointBreakdown {
            base_points: 10,
            addon_points: 10,
            total_points: 20,
        };
        OrderGamificationResult {
            points: PointsAward {
                total_points: 20,
                breakdown,
            },
            streak: StreakSummary {
                current_streak: 1,
                longest_streak: 1,
                streak_broken: false,
                milestone_reached: None,
                bonus_points: 0,
            },
            achievements: Vec::new(),
            rank_change: None,
        }
    }

    fn service(
        orders: MockOrderRepository,
        commission: MockCommissionRateRepository,
        rewards: MockRewardsEngine,
    ) -> Service {
        OrderService::new(
            Arc::new(orders),
            Arc::new(commission),
            Arc::new(rewards),
            Arc::new(MutableClock::new(now())),
        )
    }

    fn stored_order(owner: &UserId, status: OrderStatus) -> Order {
        let mut order = OrderDraft::new("Ada", "1 Main St", PlanType::Basic100, SaleType::Upgrade, 0)
            .expect("valid draft")
            .into_order(owner.clone(), 1000, now());
        order.status = status;
        order
    }

    #[rstest]
    #[tokio::test]
    async fn create_persists_then_awards(draft: OrderDraft) {
        let rep = user(UserRole::Salesperson);
        let mut orders = MockOrderRepository::new();
        let owner = rep.id.clone();
        orders
            .expect_insert()
            .withf(move |order| {
                order.salesperson_id == owner
                    && order.commission_cents == 4500
                    && order.status == OrderStatus::New
            })
            .times(1)
            .returning(|_| Ok(()));
        let mut rewards = MockRewardsEngine::new();
        rewards
            .expect_award_order()
            .times(1)
            .returning(|_| Ok(award()));

        let created = service(orders, rates(4500), rewards)
            .create_order(&rep, draft)
            .await
            .expect("order created");

        assert_eq!(created.order.points_awarded, Some(20));
        assert!(created.rewards.is_some());
        assert!(created.rewards_error.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn rewards_failure_keeps_the_order(draft: OrderDraft) {
        let mut orders = MockOrderRepository::new();
        orders.expect_insert().times(1).returning(|_| Ok(()));
        let mut rewards = MockRewardsEngine::new();
        rewards
            .expect_award_order()
            .returning(|_| Err(Error::service_unavailable("stats repository unavailable: down")));

        let created = service(orders, rates(0), rewards)
            .create_order(&user(UserRole::Salesperson), draft)
            .await
            .expect("order still created");

        assert!(created.rewards.is_none());
        assert_eq!(created.order.points_awarded, None);
        assert_eq!(
            created.rewards_error.as_deref(),
            Some("stats repository unavailable: down")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn insert_failure_skips_rewards(draft: OrderDraft) {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_insert()
            .returning(|_| Err(OrderRepositoryError::connection("refused")));
        let mut rewards = MockRewardsEngine::new();
        rewards.expect_award_order().never();

        let err = service(orders, rates(0), rewards)
            .create_order(&user(UserRole::Salesperson), draft)
            .await
            .expect_err("insert fails");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[case(UserRole::Salesperson, false)]
    #[case(UserRole::Manager, true)]
    #[case(UserRole::Admin, true)]
    #[tokio::test]
    async fn only_managers_list_everything(#[case] role: UserRole, #[case] allowed: bool) {
        let mut orders = MockOrderRepository::new();
        orders.expect_list_all().returning(|| Ok(Vec::new()));
        let result = service(orders, rates(0), MockRewardsEngine::new())
            .list_orders(&user(role), OrderScope::All)
            .await;

        match result {
            Ok(list) => {
                assert!(allowed);
                assert!(list.is_empty());
            }
            Err(err) => {
                assert!(!allowed);
                assert_eq!(err.code(), ErrorCode::Forbidden);
            }
        }
    }

    #[rstest]
    #[tokio::test]
    async fn owner_advances_own_order() {
        let rep = user(UserRole::Salesperson);
        let order = stored_order(&rep.id, OrderStatus::New);
        let order_id = order.id;
        let mut orders = MockOrderRepository::new();
        let found = order.clone();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        orders
            .expect_update_status()
            .withf(|_, from, to| *from == OrderStatus::New && *to == OrderStatus::Scheduled)
            .returning(move |_, _, to| {
                let mut updated = order.clone();
                updated.status = to;
                Ok(Some(updated))
            });

        let updated = service(orders, rates(0), MockRewardsEngine::new())
            .update_status(&rep, &order_id, OrderStatus::Scheduled)
            .await
            .expect("transition allowed");
        assert_eq!(updated.status, OrderStatus::Scheduled);
    }

    #[rstest]
    #[tokio::test]
    async fn other_salespeople_cannot_touch_the_order() {
        let order = stored_order(&UserId::random(), OrderStatus::New);
        let order_id = order.id;
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        orders.expect_update_status().never();

        let err = service(orders, rates(0), MockRewardsEngine::new())
            .update_status(&user(UserRole::Salesperson), &order_id, OrderStatus::Cancelled)
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "access denied");
    }

    #[rstest]
    #[case(OrderStatus::Completed, OrderStatus::Cancelled)]
    #[case(OrderStatus::New, OrderStatus::Completed)]
    #[tokio::test]
    async fn invalid_transitions_conflict(#[case] from: OrderStatus, #[case] to: OrderStatus) {
        let manager = user(UserRole::Manager);
        let order = stored_order(&UserId::random(), from);
        let order_id = order.id;
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order.clone())));

        let err = service(orders, rates(0), MockRewardsEngine::new())
            .update_status(&manager, &order_id, to)
            .await
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn retry_runs_the_engine_for_unawarded_orders() {
        let rep = user(UserRole::Salesperson);
        let order = stored_order(&rep.id, OrderStatus::Scheduled);
        let order_id = order.id;
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order.clone())));
        let mut rewards = MockRewardsEngine::new();
        rewards
            .expect_award_order()
            .times(1)
            .returning(|_| Ok(award()));

        let result = service(orders, rates(0), rewards)
            .retry_rewards(&rep, &order_id)
            .await
            .expect("retry succeeds");
        assert_eq!(result.points.total_points, 20);
    }

    #[rstest]
    #[tokio::test]
    async fn retry_for_missing_order_is_not_found() {
        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_id().returning(|_| Ok(None));

        let err = service(orders, rates(0), MockRewardsEngine::new())
            .retry_rewards(&user(UserRole::Admin), &OrderId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
