//! Port for per-user reward counters.
//!
//! Recording a sale is the only place the stats row changes for an order, and
//! it must be atomic: the order is claimed and the counters updated in one
//! unit of work, serialized per user.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{OrderId, SaleApplication, UserId, UserStats};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user stats repository adapters.
    pub enum UserStatsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => ServiceUnavailable: "stats repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError: "stats repository query failed: {message}",
        /// The order already carries a point award.
        AlreadyAwarded { order_id: String } => Conflict: "order {order_id} was already awarded",
        /// The order is missing or cancelled.
        NotAwardable { order_id: String } => Conflict: "order {order_id} cannot be awarded",
    }
}

/// A qualifying sale to fold into a user's counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub points: u32,
    /// Business-calendar day the order was created on.
    pub sale_day: NaiveDate,
}

/// Port for the stats row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStatsRepository: Send + Sync {
    /// Claim the order and apply the sale to the user's counters atomically.
    ///
    /// Adapters set the order's `points_awarded` only while it is still unset
    /// and the order is not cancelled, lock the stats row, apply
    /// [`UserStats::apply_sale`], and persist, all in one transaction.
    async fn record_sale(
        &self,
        sale: &SaleRecord,
    ) -> Result<SaleApplication, UserStatsRepositoryError>;

    /// Atomically add bonus points to both totals.
    async fn add_bonus_points(
        &self,
        user_id: &UserId,
        points: u32,
    ) -> Result<(), UserStatsRepositoryError>;
}

/// Fixture repository that applies sales to empty counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserStatsRepository;

#[async_trait]
impl UserStatsRepository for FixtureUserStatsRepository {
    async fn record_sale(
        &self,
        sale: &SaleRecord,
    ) -> Result<SaleApplication, UserStatsRepositoryError> {
        Ok(UserStats::empty(sale.user_id.clone()).apply_sale(sale.points, sale.sale_day))
    }

    async fn add_bonus_points(
        &self,
        _user_id: &UserId,
        _points: u32,
    ) -> Result<(), UserStatsRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_records_first_sale() {
        let repo = FixtureUserStatsRepository;
        let sale = SaleRecord {
            order_id: OrderId::random(),
            user_id: UserId::random(),
            points: 20,
            sale_day: NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date"),
        };
        let applied = repo.record_sale(&sale).await.expect("recorded");
        assert_eq!(applied.after.total_points, 20);
        assert_eq!(applied.after.streak.current, 1);
    }

    #[test]
    fn already_awarded_names_the_order() {
        let err = UserStatsRepositoryError::already_awarded("abc");
        assert_eq!(err.to_string(), "order abc was already awarded");
    }
}
