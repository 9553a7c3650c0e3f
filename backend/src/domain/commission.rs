//! Commission rates per plan tier.
//!
//! A base rate exists per plan type; a role may override it. Amounts are
//! integer cents and are stamped on the order when it is created.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PlanType, UserRole};

/// Rates applicable to one (plan type, role) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommissionRates {
    pub base_cents: Option<i64>,
    pub role_override_cents: Option<i64>,
}

impl CommissionRates {
    /// Role override wins over the base rate; `None` when neither is set.
    pub fn resolve(self) -> Option<i64> {
        self.role_override_cents.or(self.base_cents)
    }
}

/// Request to set a base rate or a role override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRateUpdate {
    pub plan_type: PlanType,
    /// Omitted for the base rate.
    pub role: Option<UserRole>,
    pub amount_cents: i64,
}

/// Validation failure for [`CommissionRateUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("commission amount must not be negative (got {0})")]
pub struct NegativeCommission(pub i64);

impl CommissionRateUpdate {
    pub fn validate(self) -> Result<Self, NegativeCommission> {
        if self.amount_cents < 0 {
            return Err(NegativeCommission(self.amount_cents));
        }
        Ok(self)
    }
}
