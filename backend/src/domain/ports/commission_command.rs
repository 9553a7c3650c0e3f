//! Driving port for commission rate administration.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, CommissionRateUpdate, Error};

/// Domain use-case port for editing commission rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommissionCommand: Send + Sync {
    /// Set a base rate or role override. Admins only.
    async fn set_commission_rate(
        &self,
        user: &AuthenticatedUser,
        update: CommissionRateUpdate,
    ) -> Result<CommissionRateUpdate, Error>;
}

/// Fixture command that refuses every change.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommissionCommand;

#[async_trait]
impl CommissionCommand for FixtureCommissionCommand {
    async fn set_commission_rate(
        &self,
        _user: &AuthenticatedUser,
        _update: CommissionRateUpdate,
    ) -> Result<CommissionRateUpdate, Error> {
        Err(Error::service_unavailable("commission rates are not configured"))
    }
}
