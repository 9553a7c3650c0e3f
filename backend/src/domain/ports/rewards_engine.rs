//! Port for the rewards step run after an order is persisted.

use async_trait::async_trait;

use crate::domain::{Error, Order, OrderGamificationResult};

/// Computes and records the gamification outcome of an order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardsEngine: Send + Sync {
    /// Award points, advance the streak, unlock achievements and report the
    /// rank movement for `order`.
    ///
    /// Fails with a conflict when the order is cancelled or already awarded.
    async fn award_order(&self, order: &Order) -> Result<OrderGamificationResult, Error>;
}

/// Fixture engine that rejects every award.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRewardsEngine;

#[async_trait]
impl RewardsEngine for FixtureRewardsEngine {
    async fn award_order(&self, _order: &Order) -> Result<OrderGamificationResult, Error> {
        Err(Error::service_unavailable("rewards are not configured"))
    }
}
