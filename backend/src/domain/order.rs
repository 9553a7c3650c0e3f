//! Orders captured by field sales representatives.
//!
//! An order is owned by exactly one salesperson. Its `points_awarded` stays
//! `None` until the rewards step claims it; once set it never changes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// Upper bound on add-ons a single order may carry.
pub const MAX_ADD_ONS: u32 = 20;
/// Longest customer name the orders table stores, in characters.
pub const MAX_CUSTOMER_NAME_CHARS: usize = 200;
/// Longest customer address the orders table stores, in characters.
pub const MAX_CUSTOMER_ADDRESS_CHARS: usize = 500;

/// Error returned when parsing one of the order enums from storage or input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseOrderFieldError {
    kind: &'static str,
    value: String,
}

impl ParseOrderFieldError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

macro_rules! string_enum {
    (
        $(#[$outer:meta])*
        $name:ident, $kind:literal {
            $( $(#[$variant_meta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $( $(#[$variant_meta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable storage representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseOrderFieldError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(ParseOrderFieldError::new($kind, other)),
                }
            }
        }
    };
}

string_enum! {
    /// Fiber plan pricing tier.
    PlanType, "plan type" {
        /// 100 Mbps entry plan.
        Basic100 => "basic_100",
        /// 300 Mbps plan.
        Standard300 => "standard_300",
        /// 500 Mbps plan.
        Premium500 => "premium_500",
        /// 1 Gbps plan.
        Gigabit1000 => "gigabit_1000",
    }
}

string_enum! {
    /// Sale classification driving the base point award.
    SaleType, "sale type" {
        /// New customer on a single service.
        Standard => "standard",
        /// Existing customer moving to a higher tier.
        Upgrade => "upgrade",
        /// Fiber bundled with another service.
        MultiService => "multi_service",
    }
}

string_enum! {
    /// Fulfilment status of an order.
    OrderStatus, "order status" {
        /// Captured, not yet scheduled.
        New => "new",
        /// Installation appointment booked.
        Scheduled => "scheduled",
        /// Equipment installed, awaiting activation.
        Installed => "installed",
        /// Service live.
        Completed => "completed",
        /// Withdrawn; excluded from every reward calculation.
        Cancelled => "cancelled",
    }
}

impl OrderStatus {
    /// Whether orders in this status count towards points, streaks and achievements.
    pub fn is_qualifying(self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Whether no further transition is allowed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether `self -> next` follows the fulfilment pipeline.
    ///
    /// Orders move one step forward at a time and may be cancelled from any
    /// non-terminal status.
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Self::New, Self::Scheduled)
                | (Self::Scheduled, Self::Installed)
                | (Self::Installed, Self::Completed)
                | (_, Self::Cancelled)
        )
    }
}

/// Order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures raised by [`OrderDraft::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    /// Customer name was blank.
    #[error("customer name must not be empty")]
    EmptyCustomerName,
    /// Customer address was blank.
    #[error("customer address must not be empty")]
    EmptyCustomerAddress,
    /// Customer name exceeded [`MAX_CUSTOMER_NAME_CHARS`].
    #[error("customer name must be at most {max} characters")]
    CustomerNameTooLong { max: usize },
    /// Customer address exceeded [`MAX_CUSTOMER_ADDRESS_CHARS`].
    #[error("customer address must be at most {max} characters")]
    CustomerAddressTooLong { max: usize },
    /// Too many add-ons were attached.
    #[error("add-ons count must be at most {max}")]
    TooManyAddOns { max: u32 },
}

/// Validated input for a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    customer_name: String,
    customer_address: String,
    plan_type: PlanType,
    sale_type: SaleType,
    add_ons_count: u32,
}

impl OrderDraft {
    /// Validate and construct a draft.
    pub fn new(
        customer_name: impl Into<String>,
        customer_address: impl Into<String>,
        plan_type: PlanType,
        sale_type: SaleType,
        add_ons_count: u32,
    ) -> Result<Self, OrderValidationError> {
        let customer_name = customer_name.into().trim().to_owned();
        let customer_address = customer_address.into().trim().to_owned();
        if customer_name.is_empty() {
            return Err(OrderValidationError::EmptyCustomerName);
        }
        if customer_name.chars().count() > MAX_CUSTOMER_NAME_CHARS {
            return Err(OrderValidationError::CustomerNameTooLong {
                max: MAX_CUSTOMER_NAME_CHARS,
            });
        }
        if customer_address.is_empty() {
            return Err(OrderValidationError::EmptyCustomerAddress);
        }
        if customer_address.chars().count() > MAX_CUSTOMER_ADDRESS_CHARS {
            return Err(OrderValidationError::CustomerAddressTooLong {
                max: MAX_CUSTOMER_ADDRESS_CHARS,
            });
        }
        if add_ons_count > MAX_ADD_ONS {
            return Err(OrderValidationError::TooManyAddOns { max: MAX_ADD_ONS });
        }
        Ok(Self {
            customer_name,
            customer_address,
            plan_type,
            sale_type,
            add_ons_count,
        })
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_address(&self) -> &str {
        &self.customer_address
    }

    pub fn plan_type(&self) -> PlanType {
        self.plan_type
    }

    pub fn sale_type(&self) -> SaleType {
        self.sale_type
    }

    pub fn add_ons_count(&self) -> u32 {
        self.add_ons_count
    }

    /// Materialise the draft into a new order owned by `salesperson_id`.
    pub fn into_order(
        self,
        salesperson_id: UserId,
        commission_cents: i64,
        created_at: DateTime<Utc>,
    ) -> Order {
        Order {
            id: OrderId::random(),
            salesperson_id,
            customer_name: self.customer_name,
            customer_address: self.customer_address,
            plan_type: self.plan_type,
            sale_type: self.sale_type,
            add_ons_count: self.add_ons_count,
            status: OrderStatus::New,
            commission_cents,
            points_awarded: None,
            created_at,
        }
    }
}

/// Persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[schema(value_type = String, format = "uuid")]
    pub id: OrderId,
    #[schema(value_type = String, format = "uuid")]
    pub salesperson_id: UserId,
    pub customer_name: String,
    pub customer_address: String,
    pub plan_type: PlanType,
    pub sale_type: SaleType,
    pub add_ons_count: u32,
    pub status: OrderStatus,
    pub commission_cents: i64,
    pub points_awarded: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether the order counts towards rewards.
    pub fn is_qualifying(&self) -> bool {
        self.status.is_qualifying()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(OrderStatus::New, OrderStatus::Scheduled, true)]
    #[case(OrderStatus::Scheduled, OrderStatus::Installed, true)]
    #[case(OrderStatus::Installed, OrderStatus::Completed, true)]
    #[case(OrderStatus::New, OrderStatus::Completed, false)]
    #[case(OrderStatus::Scheduled, OrderStatus::New, false)]
    #[case(OrderStatus::Installed, OrderStatus::Cancelled, true)]
    #[case(OrderStatus::Completed, OrderStatus::Cancelled, false)]
    #[case(OrderStatus::Cancelled, OrderStatus::New, false)]
    fn status_transitions(
        #[case] from: OrderStatus,
        #[case] to: OrderStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[rstest]
    fn only_cancelled_is_non_qualifying() {
        for status in OrderStatus::ALL {
            assert_eq!(status.is_qualifying(), *status != OrderStatus::Cancelled);
        }
    }

    #[rstest]
    #[case("basic_100", PlanType::Basic100)]
    #[case("gigabit_1000", PlanType::Gigabit1000)]
    fn plan_type_parses_storage_values(#[case] raw: &str, #[case] expected: PlanType) {
        assert_eq!(raw.parse::<PlanType>(), Ok(expected));
    }

    #[rstest]
    fn unknown_sale_type_is_rejected() {
        let err = "bundle".parse::<SaleType>().expect_err("unknown sale type");
        assert_eq!(err.to_string(), "invalid sale type: bundle");
    }

    #[rstest]
    #[case("  ", "1 Main St", 0, OrderValidationError::EmptyCustomerName)]
    #[case("Ada", "", 0, OrderValidationError::EmptyCustomerAddress)]
    #[case("Ada", "1 Main St", MAX_ADD_ONS + 1, OrderValidationError::TooManyAddOns { max: MAX_ADD_ONS })]
    fn draft_validation(
        #[case] name: &str,
        #[case] address: &str,
        #[case] add_ons: u32,
        #[case] expected: OrderValidationError,
    ) {
        let result = OrderDraft::new(name, address, PlanType::Basic100, SaleType::Standard, add_ons);
        assert_eq!(result, Err(expected));
    }

    #[rstest]
    #[case(
        "a".repeat(MAX_CUSTOMER_NAME_CHARS + 1),
        "1 Main St".to_owned(),
        OrderValidationError::CustomerNameTooLong { max: MAX_CUSTOMER_NAME_CHARS }
    )]
    #[case(
        "Ada".to_owned(),
        "b".repeat(MAX_CUSTOMER_ADDRESS_CHARS + 1),
        OrderValidationError::CustomerAddressTooLong { max: MAX_CUSTOMER_ADDRESS_CHARS }
    )]
    fn oversized_customer_text_is_rejected(
        #[case] name: String,
        #[case] address: String,
        #[case] expected: OrderValidationError,
    ) {
        let result = OrderDraft::new(name, address, PlanType::Basic100, SaleType::Standard, 0);
        assert_eq!(result, Err(expected));
    }

    #[rstest]
    fn limits_count_characters_not_bytes() {
        let name = "é".repeat(MAX_CUSTOMER_NAME_CHARS);
        let address = format!("  {}  ", "ü".repeat(MAX_CUSTOMER_ADDRESS_CHARS));
        let draft = OrderDraft::new(name, address, PlanType::Basic100, SaleType::Standard, 0)
            .expect("text at the limit is accepted");
        assert_eq!(draft.customer_address().chars().count(), MAX_CUSTOMER_ADDRESS_CHARS);
    }

    #[rstest]
    fn draft_becomes_new_unawarded_order() {
        let draft = OrderDraft::new(" Ada ", "1 Main St", PlanType::Premium500, SaleType::Upgrade, 2)
            .expect("valid draft");
        let owner = UserId::random();
        let order = draft.into_order(owner.clone(), 4500, Utc::now());
        assert_eq!(order.customer_name, "Ada");
        assert_eq!(order.salesperson_id, owner);
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.points_awarded, None);
    }
}
