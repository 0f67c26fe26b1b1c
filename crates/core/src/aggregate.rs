//! Preference summary recomputation.
//!
//! Derived fields are views over the raw wishlist and purchase arrays. Every
//! call rebuilds the full summary from scratch, so a summary that went stale
//! after a partial write converges again on the next recomputation.

use crate::extract;
use crate::types::{BudgetRange, Preferences, PurchaseRecord, WishlistEntry};

/// The full derived projection of a profile's history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceSummary {
    pub preferences: Preferences,
    pub budget_range: BudgetRange,
    pub preferred_payment_method: Option<String>,
}

/// Recompute the whole preference summary from raw history.
///
/// Pure and idempotent: the output depends only on the inputs, never on a
/// previously stored summary. Wishlist entries contribute before purchase
/// items, and within each source, array order decides first appearance.
#[must_use]
pub fn recompute(wishlist: &[WishlistEntry], purchases: &[PurchaseRecord]) -> PreferenceSummary {
    let mut preferences = Preferences::default();

    for entry in wishlist {
        push_unique(&mut preferences.categories, &entry.category);
        let attributes = extract::extract(&entry.title, &entry.category);
        push_unique(&mut preferences.brands, &attributes.brand);
        push_unique(&mut preferences.materials, &attributes.material);
    }

    for record in purchases {
        for item in &record.items {
            push_unique(&mut preferences.categories, &item.category);
            let attributes = extract::extract(&item.title, &item.category);
            push_unique(&mut preferences.brands, &attributes.brand);
            push_unique(&mut preferences.materials, &attributes.material);
        }
    }

    PreferenceSummary {
        preferences,
        budget_range: budget_range(purchases),
        preferred_payment_method: preferred_payment_method(purchases),
    }
}

/// Append `value` unless it is empty or already present.
fn push_unique(values: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !values.iter().any(|existing| existing == value) {
        values.push(value.to_owned());
    }
}

/// Min/max over every purchased item price; zeroed when nothing was bought.
fn budget_range(purchases: &[PurchaseRecord]) -> BudgetRange {
    let mut prices = purchases
        .iter()
        .flat_map(|record| record.items.iter().map(|item| item.price));

    let Some(first) = prices.next() else {
        return BudgetRange::default();
    };

    let (min, max) = prices.fold((first, first), |(min, max), price| {
        (min.min(price), max.max(price))
    });
    BudgetRange { min, max }
}

/// Most frequent payment method over the whole history.
///
/// The tally is insertion-ordered so equal counts resolve to the method
/// seen first.
fn preferred_payment_method(purchases: &[PurchaseRecord]) -> Option<String> {
    let mut tally: Vec<(&str, u32)> = Vec::new();
    for record in purchases {
        let method = record.payment_method.as_str();
        match tally.iter().position(|(seen, _)| *seen == method) {
            Some(index) => {
                if let Some((_, count)) = tally.get_mut(index) {
                    *count += 1;
                }
            }
            None => tally.push((method, 1)),
        }
    }

    tally
        .into_iter()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .map(|(method, _)| method.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::PurchaseItem;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn wish(id: &str, title: &str, category: &str, price: i64) -> WishlistEntry {
        WishlistEntry {
            id: id.to_owned(),
            title: title.to_owned(),
            category: category.to_owned(),
            price: Decimal::from(price),
            image: None,
        }
    }

    /// Items are (title, category, price) triples; the total is their sum.
    fn bought(payment_method: &str, items: &[(&str, &str, i64)]) -> PurchaseRecord {
        PurchaseRecord {
            order_id: None,
            items: items
                .iter()
                .map(|&(title, category, price)| PurchaseItem {
                    product_id: format!("p-{title}"),
                    title: title.to_owned(),
                    category: category.to_owned(),
                    price: Decimal::from(price),
                    quantity: 1,
                })
                .collect(),
            total: Decimal::from(items.iter().map(|&(_, _, price)| price).sum::<i64>()),
            payment_method: payment_method.to_owned(),
            purchased_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_history_yields_default_summary() {
        let summary = recompute(&[], &[]);
        assert!(summary.preferences.is_empty());
        assert_eq!(summary.budget_range, BudgetRange::default());
        assert_eq!(summary.preferred_payment_method, None);
    }

    #[test]
    fn test_categories_union_in_first_appearance_order() {
        let wishlist = vec![wish("p1", "Generic Widget", "Clothes", 10)];
        let purchases = vec![bought("card", &[("Thing", "Audio", 30), ("Other", "Clothes", 40)])];
        let summary = recompute(&wishlist, &purchases);
        assert_eq!(summary.preferences.categories, vec!["Clothes", "Audio"]);
    }

    #[test]
    fn test_brands_and_materials_from_both_sources() {
        let wishlist = vec![wish("p1", "Nike Jacket in Leather", "Clothes", 120)];
        let purchases = vec![bought("card", &[("Gold Ring by Cartier", "Jewelry", 900)])];
        let summary = recompute(&wishlist, &purchases);
        assert_eq!(summary.preferences.brands, vec!["Nike", "Cartier"]);
        assert_eq!(summary.preferences.materials, vec!["Leather", "Gold"]);
    }

    #[test]
    fn test_empty_attributes_are_skipped() {
        let wishlist = vec![wish("p1", "Generic Widget", "Sports", 10)];
        let summary = recompute(&wishlist, &[]);
        assert_eq!(summary.preferences.brands, vec!["Generic"]);
        assert!(summary.preferences.materials.is_empty());
    }

    #[test]
    fn test_empty_category_is_skipped() {
        let wishlist = vec![wish("p1", "Generic Widget", "", 10)];
        let summary = recompute(&wishlist, &[]);
        assert!(summary.preferences.categories.is_empty());
    }

    #[test]
    fn test_duplicate_values_appear_once() {
        let wishlist = vec![
            wish("p1", "Nike Jacket in Leather", "Clothes", 120),
            wish("p2", "Nike Cap in Leather", "Clothes", 25),
        ];
        let summary = recompute(&wishlist, &[]);
        assert_eq!(summary.preferences.categories, vec!["Clothes"]);
        assert_eq!(summary.preferences.brands, vec!["Nike"]);
        assert_eq!(summary.preferences.materials, vec!["Leather"]);
    }

    #[test]
    fn test_budget_range_spans_item_prices() {
        let purchases = vec![
            bought("card", &[("A", "Audio", 10), ("B", "Audio", 250)]),
            bought("cash", &[("C", "Audio", 40)]),
        ];
        let summary = recompute(&[], &purchases);
        assert_eq!(summary.budget_range.min, Decimal::from(10));
        assert_eq!(summary.budget_range.max, Decimal::from(250));
    }

    #[test]
    fn test_budget_range_ignores_wishlist_prices() {
        let wishlist = vec![wish("p1", "Generic Widget", "Sports", 9999)];
        let summary = recompute(&wishlist, &[]);
        assert_eq!(summary.budget_range, BudgetRange::default());
    }

    #[test]
    fn test_preferred_payment_method_majority() {
        let purchases = vec![
            bought("card", &[("A", "Audio", 10)]),
            bought("cash", &[("B", "Audio", 20)]),
            bought("card", &[("C", "Audio", 30)]),
        ];
        let summary = recompute(&[], &purchases);
        assert_eq!(summary.preferred_payment_method.as_deref(), Some("card"));
    }

    #[test]
    fn test_preferred_payment_method_tie_keeps_first_seen() {
        let purchases = vec![
            bought("cash", &[("A", "Audio", 10)]),
            bought("card", &[("B", "Audio", 20)]),
        ];
        let summary = recompute(&[], &purchases);
        assert_eq!(summary.preferred_payment_method.as_deref(), Some("cash"));
    }

    #[test]
    fn test_no_purchases_has_no_payment_method() {
        let wishlist = vec![wish("p1", "Generic Widget", "Sports", 10)];
        let summary = recompute(&wishlist, &[]);
        assert_eq!(summary.preferred_payment_method, None);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let wishlist = vec![wish("p1", "Nike Jacket in Leather", "Clothes", 120)];
        let purchases = vec![bought("card", &[("Gold Ring by Cartier", "Jewelry", 900)])];
        let first = recompute(&wishlist, &purchases);
        let second = recompute(&wishlist, &purchases);
        assert_eq!(first, second);
    }
}
