//! Port for commission rate reference data.

use async_trait::async_trait;

use crate::domain::{CommissionRateUpdate, CommissionRates, PlanType, UserRole};

use super::define_port_error;

define_port_error! {
    /// Errors raised by commission rate adapters.
    pub enum CommissionRateRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => ServiceUnavailable: "commission repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError: "commission repository query failed: {message}",
    }
}

/// Port for commission rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommissionRateRepository: Send + Sync {
    /// Base rate and role override for a plan type.
    async fn rates_for(
        &self,
        plan_type: PlanType,
        role: UserRole,
    ) -> Result<CommissionRates, CommissionRateRepositoryError>;

    /// Upsert a base rate (no role) or a role override.
    async fn upsert(&self, update: &CommissionRateUpdate) -> Result<(), CommissionRateRepositoryError>;
}

/// Fixture repository without any rates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommissionRateRepository;

#[async_trait]
impl CommissionRateRepository for FixtureCommissionRateRepository {
    async fn rates_for(
        &self,
        _plan_type: PlanType,
        _role: UserRole,
    ) -> Result<CommissionRates, CommissionRateRepositoryError> {
        Ok(CommissionRates::default())
    }

    async fn upsert(&self, _update: &CommissionRateUpdate) -> Result<(), CommissionRateRepositoryError> {
        Ok(())
    }
}
