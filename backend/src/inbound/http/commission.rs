//! Commission rate administration.
//!
//! ```text
//! PUT /api/v1/commission-rates
//! ```

use actix_web::{put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CommissionRateUpdate, PlanType, UserRole};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, out_of_range_error, parse_enum, require};

const PLAN_TYPE: FieldName = FieldName::new("planType");
const ROLE: FieldName = FieldName::new("role");
const AMOUNT: FieldName = FieldName::new("amountCents");

/// Request payload for a base rate (no `role`) or a role override.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRateRequest {
    #[schema(example = "gigabit_1000")]
    pub plan_type: Option<String>,
    #[schema(example = "manager")]
    pub role: Option<String>,
    #[schema(example = 5500)]
    pub amount_cents: Option<i64>,
}

impl TryFrom<CommissionRateRequest> for CommissionRateUpdate {
    type Error = crate::domain::Error;

    fn try_from(payload: CommissionRateRequest) -> Result<Self, Self::Error> {
        let plan_type: PlanType = parse_enum(&require(payload.plan_type, PLAN_TYPE)?, PLAN_TYPE)?;
        let role = payload
            .role
            .map(|raw| parse_enum::<UserRole>(&raw, ROLE))
            .transpose()?;
        let amount_cents = require(payload.amount_cents, AMOUNT)?;
        CommissionRateUpdate {
            plan_type,
            role,
            amount_cents,
        }
        .validate()
        .map_err(|err| out_of_range_error(AMOUNT, err.to_string()))
    }
}

/// Set a base commission rate or a role override. Admins only.
#[utoipa::path(
    put,
    path = "/api/v1/commission-rates",
    request_body = CommissionRateRequest,
    responses(
        (status = 200, description = "Stored rate", body = CommissionRateUpdate),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Admins only", body = crate::domain::Error)
    ),
    tags = ["commission"],
    operation_id = "setCommissionRate"
)]
#[put("/commission-rates")]
pub async fn set_commission_rate(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CommissionRateRequest>,
) -> ApiResult<web::Json<CommissionRateUpdate>> {
    let user = session.require_user(state.users.as_ref()).await?;
    let update = CommissionRateUpdate::try_from(payload.into_inner())?;
    let stored = state.commission.set_commission_rate(&user, update).await?;
    Ok(web::Json(stored))
}
