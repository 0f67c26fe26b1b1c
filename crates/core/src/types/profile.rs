//! The persisted user profile document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::preferences::{BudgetRange, Preferences};
use super::purchase::PurchaseRecord;
use super::wishlist::WishlistEntry;

/// One user's wishlist, purchase history, and derived preference summary.
///
/// `wishlist` and `purchases` are the source of truth. `preferences`,
/// `budget_range`, and `preferred_payment_method` are derived views that
/// sync operations rewrite wholesale; nothing ever patches them
/// incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Opaque user identity issued by the auth provider.
    pub uid: String,
    /// Saved products, unique by product id.
    #[serde(default)]
    pub wishlist: Vec<WishlistEntry>,
    /// Append-only purchase history in acceptance order.
    #[serde(default)]
    pub purchases: Vec<PurchaseRecord>,
    /// Derived category/brand/material sets.
    #[serde(default)]
    pub preferences: Preferences,
    /// Derived spending range over purchased items.
    #[serde(default)]
    pub budget_range: BudgetRange,
    /// Most frequent payment method, when any purchase exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create an empty profile for `uid` with zeroed derived fields.
    #[must_use]
    pub fn new(uid: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            uid: uid.into(),
            wishlist: Vec::new(),
            purchases: Vec::new(),
            preferences: Preferences::default(),
            budget_range: BudgetRange::default(),
            preferred_payment_method: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the wishlist already holds an entry with this product id.
    #[must_use]
    pub fn wishlist_contains(&self, product_id: &str) -> bool {
        self.wishlist.iter().any(|entry| entry.id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_profile_is_zeroed() {
        let profile = UserProfile::new("user-1", now());
        assert!(profile.wishlist.is_empty());
        assert!(profile.purchases.is_empty());
        assert!(profile.preferences.is_empty());
        assert_eq!(profile.budget_range, BudgetRange::default());
        assert_eq!(profile.preferred_payment_method, None);
        assert_eq!(profile.created_at, profile.updated_at);
    }

    #[test]
    fn test_missing_arrays_default_on_deserialize() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"uid":"user-1","createdAt":"2025-03-01T12:00:00Z","updatedAt":"2025-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert!(profile.wishlist.is_empty());
        assert!(profile.purchases.is_empty());
        assert!(profile.preferences.is_empty());
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let profile = UserProfile::new("user-1", now());
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("budgetRange").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("preferredPaymentMethod").is_none());
    }

    #[test]
    fn test_wishlist_contains() {
        let mut profile = UserProfile::new("user-1", now());
        profile.wishlist.push(WishlistEntry {
            id: "p1".to_owned(),
            title: "Widget".to_owned(),
            category: "Sports".to_owned(),
            price: rust_decimal::Decimal::from(10),
            image: None,
        });
        assert!(profile.wishlist_contains("p1"));
        assert!(!profile.wishlist_contains("p2"));
    }
}
