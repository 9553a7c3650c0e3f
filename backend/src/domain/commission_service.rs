//! Commission lookup and administration.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CommissionCommand, CommissionRateRepository,
};
use crate::domain::{AuthenticatedUser, CommissionRateUpdate, Error, PlanType, UserRole};

/// Commission in cents for a sale of `plan_type` by a user with `role`.
///
/// A role override wins over the base rate. When neither exists the sale
/// earns no commission and the gap is logged.
pub async fn commission_for<C>(repo: &C, plan_type: PlanType, role: UserRole) -> Result<i64, Error>
where
    C: CommissionRateRepository + ?Sized,
{
    let rates = repo
        .rates_for(plan_type, role)
        .await?;
    Ok(rates.resolve().unwrap_or_else(|| {
        warn!(plan_type = %plan_type, role = %role, "no commission rate configured");
        0
    }))
}

/// Service implementing commission administration.
#[derive(Clone)]
pub struct CommissionService<C> {
    rate_repo: Arc<C>,
}

impl<C> CommissionService<C> {
    pub fn new(rate_repo: Arc<C>) -> Self {
        Self { rate_repo }
    }
}

#[async_trait]
impl<C> CommissionCommand for CommissionService<C>
where
    C: CommissionRateRepository,
{
    async fn set_commission_rate(
        &self,
        user: &AuthenticatedUser,
        update: CommissionRateUpdate,
    ) -> Result<CommissionRateUpdate, Error> {
        if !user.role.can_edit_rates() {
            return Err(Error::forbidden("access denied"));
        }
        let update = update.validate().map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "amountCents",
                "code": "negative_amount",
            }))
        })?;

        self.rate_repo
            .upsert(&update)
            .await?;
        info!(
            plan_type = %update.plan_type,
            role = update.role.map(UserRole::as_str),
            amount_cents = update.amount_cents,
            updated_by = %user.id,
            "commission rate updated"
        );
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockCommissionRateRepository;
    use crate::domain::{CommissionRates, ErrorCode, UserId};
    use rstest::rstest;

    fn user(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::random(),
            email: "rep@example.com".to_owned(),
            role,
        }
    }

    fn update(amount_cents: i64) -> CommissionRateUpdate {
        CommissionRateUpdate {
            plan_type: PlanType::Gigabit1000,
            role: Some(UserRole::Salesperson),
            amount_cents,
        }
    }

    #[rstest]
    #[case(CommissionRates { base_cents: Some(2500), role_override_cents: Some(3000) }, 3000)]
    #[case(CommissionRates { base_cents: Some(2500), role_override_cents: None }, 2500)]
    #[case(CommissionRates::default(), 0)]
    #[tokio::test]
    async fn lookup_prefers_role_override(#[case] rates: CommissionRates, #[case] expected: i64) {
        let mut repo = MockCommissionRateRepository::new();
        repo.expect_rates_for().returning(move |_, _| Ok(rates));

        let cents = commission_for(&repo, PlanType::Basic100, UserRole::Salesperson)
            .await
            .expect("lookup succeeds");
        assert_eq!(cents, expected);
    }

    #[rstest]
    #[case(UserRole::Salesperson)]
    #[case(UserRole::Manager)]
    #[tokio::test]
    async fn only_admins_may_edit_rates(#[case] role: UserRole) {
        let mut repo = MockCommissionRateRepository::new();
        repo.expect_upsert().never();
        let service = CommissionService::new(Arc::new(repo));

        let err = service
            .set_commission_rate(&user(role), update(100))
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "access denied");
    }

    #[rstest]
    #[tokio::test]
    async fn admin_update_is_persisted() {
        let mut repo = MockCommissionRateRepository::new();
        repo.expect_upsert()
            .withf(|update| update.amount_cents == 4200)
            .times(1)
            .returning(|_| Ok(()));
        let service = CommissionService::new(Arc::new(repo));

        let saved = service
            .set_commission_rate(&user(UserRole::Admin), update(4200))
            .await
            .expect("update succeeds");
        assert_eq!(saved.amount_cents, 4200);
    }

    #[rstest]
    #[tokio::test]
    async fn negative_amount_is_invalid() {
        let service = CommissionService::new(Arc::new(MockCommissionRateRepository::new()));
        let err = service
            .set_commission_rate(&user(UserRole::Admin), update(-5))
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
