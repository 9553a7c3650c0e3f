//! Order entry HTTP handlers.
//!
//! ```text
//! POST  /api/v1/orders
//! GET   /api/v1/orders?scope=mine|all
//! PATCH /api/v1/orders/{id}/status
//! POST  /api/v1/orders/{id}/rewards
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{OrderCreated, OrderScope};
use crate::domain::{
    Error, Order, OrderDraft, OrderGamificationResult, OrderId, OrderStatus,
    OrderValidationError, PlanType, SaleType,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, out_of_range_error, parse_enum, parse_uuid, require,
};

const CUSTOMER_NAME: FieldName = FieldName::new("customerName");
const CUSTOMER_ADDRESS: FieldName = FieldName::new("customerAddress");
const PLAN_TYPE: FieldName = FieldName::new("planType");
const SALE_TYPE: FieldName = FieldName::new("saleType");
const ADD_ONS: FieldName = FieldName::new("addOnsCount");
const STATUS: FieldName = FieldName::new("status");
const SCOPE: FieldName = FieldName::new("scope");
const ORDER_ID: FieldName = FieldName::new("id");

/// Request payload for a new order.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_address: Option<String>,
    #[schema(example = "premium_500")]
    pub plan_type: Option<String>,
    #[schema(example = "standard")]
    pub sale_type: Option<String>,
    /// Defaults to zero.
    pub add_ons_count: Option<u32>,
}

impl TryFrom<CreateOrderRequest> for OrderDraft {
    type Error = Error;

    fn try_from(payload: CreateOrderRequest) -> Result<Self, Self::Error> {
        let customer_name = require(payload.customer_name, CUSTOMER_NAME)?;
        let customer_address = require(payload.customer_address, CUSTOMER_ADDRESS)?;
        let plan_type: PlanType = parse_enum(&require(payload.plan_type, PLAN_TYPE)?, PLAN_TYPE)?;
        let sale_type: SaleType = parse_enum(&require(payload.sale_type, SALE_TYPE)?, SALE_TYPE)?;
        OrderDraft::new(
            customer_name,
            customer_address,
            plan_type,
            sale_type,
            payload.add_ons_count.unwrap_or(0),
        )
        .map_err(draft_error)
    }
}

fn draft_error(error: OrderValidationError) -> Error {
    let field = match error {
        OrderValidationError::EmptyCustomerName
        | OrderValidationError::CustomerNameTooLong { .. } => CUSTOMER_NAME,
        OrderValidationError::EmptyCustomerAddress
        | OrderValidationError::CustomerAddressTooLong { .. } => CUSTOMER_ADDRESS,
        OrderValidationError::TooManyAddOns { .. } => ADD_ONS,
    };
    out_of_range_error(field, error.to_string())
}

/// Request payload for a status transition.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StatusUpdateRequest {
    #[schema(example = "scheduled")]
    pub status: Option<String>,
}

/// Query parameters for listing orders.
#[derive(Debug, Deserialize, IntoParams)]
pub struct OrdersQuery {
    /// `mine` (default) or `all`.
    pub scope: Option<String>,
}

fn order_id_from_path(raw: &str) -> Result<OrderId, Error> {
    parse_uuid(raw, ORDER_ID).map(OrderId::from_uuid)
}

/// Record a sale and run the rewards step.
///
/// The order is stored even when rewards fail; `rewardsError` then explains
/// what went wrong and `POST /orders/{id}/rewards` retries.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order stored", body = OrderCreated),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateOrderRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user(state.users.as_ref()).await?;
    let draft = OrderDraft::try_from(payload.into_inner())?;
    let created = state.orders.create_order(&user, draft).await?;
    Ok(HttpResponse::Created().json(created))
}

/// List orders visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrdersQuery),
    responses(
        (status = 200, description = "Orders, newest first", body = [Order]),
        (status = 400, description = "Invalid scope", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Scope not permitted", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<OrdersQuery>,
) -> ApiResult<web::Json<Vec<Order>>> {
    let user = session.require_user(state.users.as_ref()).await?;
    let scope = match query.into_inner().scope {
        Some(raw) => parse_enum::<OrderScope>(&raw, SCOPE)?,
        None => OrderScope::default(),
    };
    let orders = state.orders_query.list_orders(&user, scope).await?;
    Ok(web::Json(orders))
}

/// Move an order to a new status.
#[utoipa::path(
    patch,
    path = "/api/v1/orders/{id}/status",
    params(("id" = String, Path, description = "Order id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Transition not allowed", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrderStatus"
)]
#[patch("/orders/{id}/status")]
pub async fn update_order_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusUpdateRequest>,
) -> ApiResult<web::Json<Order>> {
    let user = session.require_user(state.users.as_ref()).await?;
    let order_id = order_id_from_path(&path)?;
    let status: OrderStatus = parse_enum(&require(payload.into_inner().status, STATUS)?, STATUS)?;
    let order = state.orders.update_status(&user, &order_id, status).await?;
    Ok(web::Json(order))
}

/// Retry the rewards step for an order whose award never landed.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/rewards",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Rewards granted", body = OrderGamificationResult),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Already awarded or cancelled", body = Error)
    ),
    tags = ["orders"],
    operation_id = "retryOrderRewards"
)]
#[post("/orders/{id}/rewards")]
pub async fn retry_rewards(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderGamificationResult>> {
    let user = session.require_user(state.users.as_ref()).await?;
    let order_id = order_id_from_path(&path)?;
    let result = state.orders.retry_rewards(&user, &order_id).await?;
    Ok(web::Json(result))
}
