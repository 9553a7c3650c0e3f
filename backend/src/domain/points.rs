//! Point award for a single sale.
//!
//! Points are decoupled from plan pricing and commission: only the sale type
//! and the number of add-ons contribute.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::SaleType;

/// Points granted for each add-on attached to a sale.
pub const ADD_ON_POINTS: u32 = 5;

/// Base points granted per sale type.
pub const fn sale_type_points(sale_type: SaleType) -> u32 {
    match sale_type {
        SaleType::Standard => 10,
        SaleType::Upgrade => 20,
        SaleType::MultiService => 30,
    }
}

/// Itemised point award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointBreakdown {
    pub base_points: u32,
    pub addon_points: u32,
    pub total_points: u32,
}

/// Compute the award for a sale.
///
/// # Examples
/// ```
/// use fieldsales::domain::{SaleType, calculate_points};
///
/// let award = calculate_points(SaleType::Standard, 2);
/// assert_eq!((award.base_points, award.addon_points, award.total_points), (10, 10, 20));
/// ```
pub fn calculate_points(sale_type: SaleType, add_ons_count: u32) -> PointBreakdown {
    let base_points = sale_type_points(sale_type);
    let addon_points = add_ons_count.saturating_mul(ADD_ON_POINTS);
    PointBreakdown {
        base_points,
        addon_points,
        total_points: base_points.saturating_add(addon_points),
    }
}
