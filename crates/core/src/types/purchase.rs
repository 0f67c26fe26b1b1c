//! Purchase history types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line item of a completed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    /// Product identifier.
    pub product_id: String,
    /// Listing title at purchase time.
    pub title: String,
    /// Product category at purchase time.
    pub category: String,
    /// Unit price paid.
    pub price: Decimal,
    /// Units purchased.
    pub quantity: u32,
}

/// A completed checkout, as handed over by the payment flow.
///
/// Records are append-only: once accepted into a profile they are never
/// edited or removed. `purchased_at` is stamped by the engine at accept
/// time, not supplied by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    /// Checkout order id, when the payment flow supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Ordered line items.
    pub items: Vec<PurchaseItem>,
    /// Total amount charged.
    pub total: Decimal,
    /// Payment method label (e.g. "card", "cash").
    pub payment_method: String,
    /// Acceptance timestamp.
    pub purchased_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let record: PurchaseRecord = serde_json::from_str(
            r#"{
                "orderId": "ord-7",
                "items": [
                    {"productId": "p1", "title": "Widget", "category": "Sports", "price": 10.0, "quantity": 2}
                ],
                "total": 20.0,
                "paymentMethod": "card",
                "purchasedAt": "2025-03-01T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(record.order_id.as_deref(), Some("ord-7"));
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.payment_method, "card");
    }

    #[test]
    fn test_order_id_defaults_to_none() {
        let record: PurchaseRecord = serde_json::from_str(
            r#"{"items": [], "total": 0.0, "paymentMethod": "cash", "purchasedAt": "2025-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(record.order_id, None);

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("orderId").is_none());
        assert!(json.get("purchasedAt").is_some());
    }
}
