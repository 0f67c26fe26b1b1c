//! Wishlist entry type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product saved to a user's wishlist.
///
/// Entries are unique by [`id`](Self::id) within one profile; adding an id
/// that is already present is a no-op at the profile level. The `productId`
/// alias accepts documents written by older storefront clients, which used
/// that spelling for the same field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    /// Product identifier, unique within one wishlist.
    #[serde(alias = "productId")]
    pub id: String,
    /// Listing title as shown in the storefront.
    pub title: String,
    /// Product category (e.g. "Jewelry", "Electronics").
    pub category: String,
    /// Listed price at the time the entry was saved.
    pub price: Decimal,
    /// Product image URL, carried as an opaque string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
