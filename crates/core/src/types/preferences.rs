//! Derived preference types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Favored categories, brands, and materials derived from a profile's
/// wishlist and purchase history.
///
/// Projections, not state: every recomputation rebuilds the lists wholesale
/// from the source arrays, so removed wishlist entries stop contributing.
/// List order is first appearance during recomputation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub materials: Vec<String>,
}

impl Preferences {
    /// Whether all three lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.brands.is_empty() && self.materials.is_empty()
    }
}

/// Observed spending range over purchased items.
///
/// Bounds cover item prices from the purchase history only; wishlist prices
/// reflect aspiration, not spending, and are excluded. Both bounds are zero
/// until the first purchase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: Decimal,
    pub max: Decimal,
}
