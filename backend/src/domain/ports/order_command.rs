//! Driving port for order mutations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthenticatedUser, Error, Order, OrderDraft, OrderGamificationResult, OrderId, OrderStatus,
};

/// Outcome of creating an order.
///
/// The order is durable even when the rewards step failed; in that case
/// `rewards` is absent and `rewards_error` explains why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards: Option<OrderGamificationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards_error: Option<String>,
}

/// Domain use-case port for creating and updating orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Persist a new order for `user` and run the rewards step.
    async fn create_order(
        &self,
        user: &AuthenticatedUser,
        draft: OrderDraft,
    ) -> Result<OrderCreated, Error>;

    /// Move an order through the fulfilment pipeline.
    async fn update_status(
        &self,
        user: &AuthenticatedUser,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, Error>;

    /// Re-run the rewards step for an order whose award never landed.
    async fn retry_rewards(
        &self,
        user: &AuthenticatedUser,
        order_id: &OrderId,
    ) -> Result<OrderGamificationResult, Error>;
}

/// Fixture command that rejects every mutation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderCommand;

#[async_trait]
impl OrderCommand for FixtureOrderCommand {
    async fn create_order(
        &self,
        _user: &AuthenticatedUser,
        _draft: OrderDraft,
    ) -> Result<OrderCreated, Error> {
        Err(Error::service_unavailable("orders are not configured"))
    }

    async fn update_status(
        &self,
        _user: &AuthenticatedUser,
        order_id: &OrderId,
        _status: OrderStatus,
    ) -> Result<Order, Error> {
        Err(Error::not_found(format!("order {order_id} not found")))
    }

    async fn retry_rewards(
        &self,
        _user: &AuthenticatedUser,
        order_id: &OrderId,
    ) -> Result<OrderGamificationResult, Error> {
        Err(Error::not_found(format!("order {order_id} not found")))
    }
}
