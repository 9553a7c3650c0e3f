//! PostgreSQL-backed commission rates.
//!
//! Base rates live in `commission_rates`; role overrides live in
//! `role_commission_rates` and win over the base rate when present.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommissionRateRepository, CommissionRateRepositoryError};
use crate::domain::{CommissionRateUpdate, CommissionRates, PlanType, UserRole};

use super::error_mapping::port_error_mapping;
use super::models::{NewCommissionRateRow, NewRoleCommissionRateRow};
use super::pool::DbPool;
use super::schema::{commission_rates, role_commission_rates};

/// Diesel-backed implementation of the `CommissionRateRepository` port.
#[derive(Clone)]
pub struct DieselCommissionRateRepository {
    pool: DbPool,
}

impl DieselCommissionRateRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

port_error_mapping!(CommissionRateRepositoryError, "commission rates");

#[async_trait]
impl CommissionRateRepository for DieselCommissionRateRepository {
    async fn rates_for(
        &self,
        plan_type: PlanType,
        role: UserRole,
    ) -> Result<CommissionRates, CommissionRateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let base_cents: Option<i64> = commission_rates::table
            .filter(commission_rates::plan_type.eq(plan_type.as_str()))
            .select(commission_rates::amount_cents)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let role_override_cents: Option<i64> = role_commission_rates::table
            .filter(role_commission_rates::plan_type.eq(plan_type.as_str()))
            .filter(role_commission_rates::role.eq(role.as_str()))
            .select(role_commission_rates::amount_cents)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(CommissionRates {
            base_cents,
            role_override_cents,
        })
    }

    async fn upsert(&self, update: &CommissionRateUpdate) -> Result<(), CommissionRateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let plan_type = update.plan_type.as_str();
        let written = match update.role {
            None => {
                diesel::insert_into(commission_rates::table)
                    .values(&NewCommissionRateRow {
                        plan_type,
                        amount_cents: update.amount_cents,
                    })
                    .on_conflict(commission_rates::plan_type)
                    .do_update()
                    .set((
                        commission_rates::amount_cents.eq(excluded(commission_rates::amount_cents)),
                        commission_rates::updated_at.eq(diesel::dsl::now),
                    ))
                    .execute(&mut conn)
                    .await
            }
            Some(role) => {
                diesel::insert_into(role_commission_rates::table)
                    .values(&NewRoleCommissionRateRow {
                        plan_type,
                        role: role.as_str(),
                        amount_cents: update.amount_cents,
                    })
                    .on_conflict((role_commission_rates::plan_type, role_commission_rates::role))
                    .do_update()
                    .set((
                        role_commission_rates::amount_cents
                            .eq(excluded(role_commission_rates::amount_cents)),
                        role_commission_rates::updated_at.eq(diesel::dsl::now),
                    ))
                    .execute(&mut conn)
                    .await
            }
        };
        written.map(|_| ()).map_err(map_diesel_error)
    }
}
