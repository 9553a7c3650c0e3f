//! Port for order persistence.

use async_trait::async_trait;

use crate::domain::{Order, OrderId, OrderStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => ServiceUnavailable: "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError: "order repository query failed: {message}",
    }
}

/// Port for storing and reading orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a newly created order.
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    /// Fetch one order.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Orders owned by a salesperson, newest first.
    async fn list_for_salesperson(
        &self,
        salesperson_id: &UserId,
    ) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Every order, newest first.
    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Move an order from `expected` to `next`.
    ///
    /// Returns `None` when the order no longer has status `expected`, so a
    /// concurrent update is never silently overwritten.
    async fn update_status(
        &self,
        id: &OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Option<Order>, OrderRepositoryError>;

    /// Number of non-cancelled orders owned by a salesperson.
    async fn count_qualifying(&self, salesperson_id: &UserId) -> Result<u64, OrderRepositoryError>;
}

/// Fixture repository that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderRepository;

#[async_trait]
impl OrderRepository for FixtureOrderRepository {
    async fn insert(&self, _order: &Order) -> Result<(), OrderRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(None)
    }

    async fn list_for_salesperson(
        &self,
        _salesperson_id: &UserId,
    ) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_status(
        &self,
        _id: &OrderId,
        _expected: OrderStatus,
        _next: OrderStatus,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(None)
    }

    async fn count_qualifying(&self, _salesperson_id: &UserId) -> Result<u64, OrderRepositoryError> {
        Ok(0)
    }
}
