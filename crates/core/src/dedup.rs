//! Duplicate-purchase detection.
//!
//! Checkout clients retry on flaky connections, so the same completed order
//! can arrive more than once within a few seconds. The guard compares an
//! incoming record against recent history and drops resubmissions. This is
//! best-effort idempotence against client retries, not exactly-once
//! delivery; the store's version check covers the concurrent-writer gap.

use chrono::{DateTime, TimeDelta, Utc};

use crate::types::PurchaseRecord;

/// Trailing window within which duplicate detection applies, in seconds.
pub const RECENT_WINDOW_SECONDS: i64 = 5;

/// Outcome of a duplicate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupDecision {
    /// No recent equivalent found; record the purchase.
    Accept,
    /// A recent equivalent exists; drop the submission.
    Duplicate,
}

impl DedupDecision {
    #[must_use]
    pub const fn is_duplicate(self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

/// Decide whether `candidate` duplicates a purchase already in `history`.
///
/// Only history entries younger than [`RECENT_WINDOW_SECONDS`] relative to
/// `now` are considered. Within the window a candidate is a duplicate when
/// either both sides carry the same non-empty order id, or the totals, item
/// counts, and per-position item prices and quantities all match.
#[must_use]
pub fn check(
    candidate: &PurchaseRecord,
    history: &[PurchaseRecord],
    now: DateTime<Utc>,
) -> DedupDecision {
    let window = TimeDelta::seconds(RECENT_WINDOW_SECONDS);
    let mut recent = history
        .iter()
        .filter(|entry| now.signed_duration_since(entry.purchased_at) < window);

    if recent.any(|entry| same_order_id(candidate, entry) || same_shape(candidate, entry)) {
        DedupDecision::Duplicate
    } else {
        DedupDecision::Accept
    }
}

/// Both sides carry the same non-empty order id.
fn same_order_id(candidate: &PurchaseRecord, entry: &PurchaseRecord) -> bool {
    match candidate.order_id.as_deref() {
        Some(id) if !id.is_empty() => entry.order_id.as_deref() == Some(id),
        _ => false,
    }
}

/// Same total and positionally identical item prices and quantities.
///
/// Order-sensitive on purpose: reordered line items describe a different
/// checkout, not a retry of the same one.
fn same_shape(candidate: &PurchaseRecord, entry: &PurchaseRecord) -> bool {
    entry.total == candidate.total
        && entry.items.len() == candidate.items.len()
        && entry
            .items
            .iter()
            .zip(&candidate.items)
            .all(|(a, b)| a.price == b.price && a.quantity == b.quantity)
}
