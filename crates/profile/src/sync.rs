//! Profile synchronization operations.
//!
//! The orchestrator is stateless per call: every operation re-reads the
//! authoritative profile, applies the pure core logic, and writes back
//! through the store. Mutations run as optimistic-concurrency loops; on a
//! version conflict the whole read-modify-write cycle reruns against fresh
//! state, so concurrent calls for one user converge instead of
//! double-writing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::instrument;

use fincommerce_core::types::{
    Preferences, PurchaseItem, PurchaseRecord, UserProfile, WishlistEntry,
};
use fincommerce_core::{aggregate, dedup};

use crate::error::{AppError, Result};
use crate::store::{ProfileFields, ProfileStore, StoreError};

/// Attempts per mutating operation before conceding the write to contention.
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// A purchase as handed over by the checkout flow.
///
/// Carries no timestamp; the engine stamps `purchased_at` at accept time.
#[derive(Debug, Clone)]
pub struct PurchaseSubmission {
    pub order_id: Option<String>,
    pub items: Vec<PurchaseItem>,
    pub total: Decimal,
    pub payment_method: String,
}

impl PurchaseSubmission {
    fn into_record(self, purchased_at: DateTime<Utc>) -> PurchaseRecord {
        PurchaseRecord {
            order_id: self.order_id,
            items: self.items,
            total: self.total,
            payment_method: self.payment_method,
            purchased_at,
        }
    }
}

/// Outcome of a purchase submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The purchase was appended to the history.
    Accepted,
    /// A recent equivalent was already recorded; nothing was written.
    Duplicate,
}

/// Orchestrates profile operations against the external store.
#[derive(Clone)]
pub struct ProfileSync {
    store: Arc<dyn ProfileStore>,
}

impl ProfileSync {
    #[must_use]
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Fetch a profile for read-only access.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no profile exists for `uid`.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, uid: &str) -> Result<UserProfile> {
        self.store
            .get_profile(uid)
            .await?
            .map(|versioned| versioned.profile)
            .ok_or_else(|| AppError::NotFound(uid.to_owned()))
    }

    /// Add an entry to the wishlist, creating the profile when absent.
    ///
    /// Re-adding a product id that is already saved is a no-op without a
    /// write.
    #[instrument(skip(self, entry), fields(product_id = %entry.id))]
    pub async fn add_to_wishlist(&self, uid: &str, entry: &WishlistEntry) -> Result<()> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let observed = self.store.get_profile(uid).await?;
            let version = observed.as_ref().map(|versioned| versioned.version);

            if observed
                .as_ref()
                .is_some_and(|versioned| versioned.profile.wishlist_contains(&entry.id))
            {
                return Ok(());
            }

            match self.store.append_wishlist_entry(uid, entry, version).await {
                Ok(()) => return Ok(()),
                Err(StoreError::VersionConflict) if attempts < MAX_WRITE_ATTEMPTS => {
                    tracing::debug!(attempts, "wishlist add lost a version race, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Remove the entry with `product_id` from the wishlist.
    ///
    /// An absent profile or an id that is not saved is a no-op; neither
    /// creates a profile.
    #[instrument(skip(self))]
    pub async fn remove_from_wishlist(&self, uid: &str, product_id: &str) -> Result<()> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let Some(observed) = self.store.get_profile(uid).await? else {
                return Ok(());
            };
            if !observed.profile.wishlist_contains(product_id) {
                return Ok(());
            }

            let mut wishlist = observed.profile.wishlist;
            wishlist.retain(|entry| entry.id != product_id);
            let fields = ProfileFields {
                wishlist: Some(wishlist),
                ..ProfileFields::default()
            };

            match self
                .store
                .upsert_fields(uid, fields, Some(observed.version))
                .await
            {
                Ok(()) => return Ok(()),
                Err(StoreError::VersionConflict) if attempts < MAX_WRITE_ATTEMPTS => {
                    tracing::debug!(attempts, "wishlist remove lost a version race, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Empty the wishlist, creating the profile when absent.
    #[instrument(skip(self))]
    pub async fn clear_wishlist(&self, uid: &str) -> Result<()> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let observed = self.store.get_profile(uid).await?;
            let version = observed.as_ref().map(|versioned| versioned.version);

            let fields = ProfileFields {
                wishlist: Some(Vec::new()),
                ..ProfileFields::default()
            };

            match self.store.upsert_fields(uid, fields, version).await {
                Ok(()) => return Ok(()),
                Err(StoreError::VersionConflict) if attempts < MAX_WRITE_ATTEMPTS => {
                    tracing::debug!(attempts, "wishlist clear lost a version race, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Record a completed purchase unless a recent equivalent exists.
    ///
    /// Acceptance appends the record and then refreshes the
    /// purchase-derived summary fields. A failure after the append leaves
    /// the summary stale but the history correct; the next recomputation
    /// converges it.
    #[instrument(skip(self, submission), fields(order_id = ?submission.order_id))]
    pub async fn record_purchase(
        &self,
        uid: &str,
        submission: PurchaseSubmission,
    ) -> Result<PurchaseOutcome> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let now = Utc::now();
            let observed = self.store.get_profile(uid).await?;
            let version = observed.as_ref().map(|versioned| versioned.version);
            let history = observed
                .map(|versioned| versioned.profile.purchases)
                .unwrap_or_default();

            let candidate = submission.clone().into_record(now);
            if dedup::check(&candidate, &history, now).is_duplicate() {
                tracing::info!(uid, "duplicate purchase dropped");
                return Ok(PurchaseOutcome::Duplicate);
            }

            match self.store.append_purchase(uid, &candidate, version).await {
                Ok(()) => break,
                Err(StoreError::VersionConflict) if attempts < MAX_WRITE_ATTEMPTS => {
                    tracing::debug!(attempts, "purchase append lost a version race, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.refresh_purchase_summary(uid).await?;
        Ok(PurchaseOutcome::Accepted)
    }

    /// Recompute the preference sets from current history and persist them.
    ///
    /// Returns the freshly computed sets. Only the preference lists are
    /// written; the purchase-derived fields refresh on purchase recording.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no profile exists for `uid`.
    #[instrument(skip(self))]
    pub async fn sync_preferences(&self, uid: &str) -> Result<Preferences> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let Some(observed) = self.store.get_profile(uid).await? else {
                return Err(AppError::NotFound(uid.to_owned()));
            };

            let summary =
                aggregate::recompute(&observed.profile.wishlist, &observed.profile.purchases);
            let fields = ProfileFields {
                preferences: Some(summary.preferences.clone()),
                ..ProfileFields::default()
            };

            match self
                .store
                .upsert_fields(uid, fields, Some(observed.version))
                .await
            {
                Ok(()) => return Ok(summary.preferences),
                Err(StoreError::VersionConflict) if attempts < MAX_WRITE_ATTEMPTS => {
                    tracing::debug!(attempts, "preference sync lost a version race, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Recompute and persist the purchase-derived fields from a fresh read.
    async fn refresh_purchase_summary(&self, uid: &str) -> Result<()> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let Some(observed) = self.store.get_profile(uid).await? else {
                // The append just created the row; absence here means the
                // store lost it out from under us.
                return Err(AppError::NotFound(uid.to_owned()));
            };

            let summary =
                aggregate::recompute(&observed.profile.wishlist, &observed.profile.purchases);
            let fields = ProfileFields {
                budget_range: Some(summary.budget_range),
                preferred_payment_method: Some(summary.preferred_payment_method),
                ..ProfileFields::default()
            };

            match self
                .store
                .upsert_fields(uid, fields, Some(observed.version))
                .await
            {
                Ok(()) => return Ok(()),
                Err(StoreError::VersionConflict) if attempts < MAX_WRITE_ATTEMPTS => {
                    tracing::debug!(attempts, "summary refresh lost a version race, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryProfileStore;
    use fincommerce_core::types::BudgetRange;

    fn sync_over_memory() -> (ProfileSync, Arc<MemoryProfileStore>) {
        let store = Arc::new(MemoryProfileStore::new());
        (ProfileSync::new(store.clone()), store)
    }

    fn entry(id: &str, title: &str, category: &str, price: i64) -> WishlistEntry {
        WishlistEntry {
            id: id.to_owned(),
            title: title.to_owned(),
            category: category.to_owned(),
            price: Decimal::from(price),
            image: None,
        }
    }

    fn submission(order_id: Option<&str>, total: i64, payment_method: &str) -> PurchaseSubmission {
        PurchaseSubmission {
            order_id: order_id.map(str::to_owned),
            items: vec![PurchaseItem {
                product_id: "p1".to_owned(),
                title: "Sony Speaker with Aluminum finish".to_owned(),
                category: "Audio".to_owned(),
                price: Decimal::from(total),
                quantity: 1,
            }],
            total: Decimal::from(total),
            payment_method: payment_method.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_get_profile_unknown_uid_is_not_found() {
        let (sync, _) = sync_over_memory();
        let err = sync.get_profile("user-1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_to_wishlist_creates_profile() {
        let (sync, store) = sync_over_memory();
        sync.add_to_wishlist("user-1", &entry("p1", "Generic Widget", "Sports", 10))
            .await
            .unwrap();

        let versioned = store.get_profile("user-1").await.unwrap().unwrap();
        assert_eq!(versioned.profile.wishlist.len(), 1);
        assert!(versioned.profile.preferences.is_empty());
        assert_eq!(versioned.profile.budget_range, BudgetRange::default());
    }

    #[tokio::test]
    async fn test_re_adding_same_product_is_a_no_op() {
        let (sync, store) = sync_over_memory();
        let item = entry("p1", "Generic Widget", "Sports", 10);
        sync.add_to_wishlist("user-1", &item).await.unwrap();
        let before = store.get_profile("user-1").await.unwrap().unwrap();

        sync.add_to_wishlist("user-1", &item).await.unwrap();
        let after = store.get_profile("user-1").await.unwrap().unwrap();

        assert_eq!(after.profile.wishlist.len(), 1);
        // No write happened, so the version is untouched.
        assert_eq!(after.version, before.version);
    }

    #[tokio::test]
    async fn test_remove_from_wishlist() {
        let (sync, store) = sync_over_memory();
        sync.add_to_wishlist("user-1", &entry("p1", "Generic Widget", "Sports", 10))
            .await
            .unwrap();
        sync.add_to_wishlist("user-1", &entry("p2", "Other Widget", "Sports", 20))
            .await
            .unwrap();

        sync.remove_from_wishlist("user-1", "p1").await.unwrap();

        let versioned = store.get_profile("user-1").await.unwrap().unwrap();
        assert_eq!(versioned.profile.wishlist.len(), 1);
        assert!(!versioned.profile.wishlist_contains("p1"));
    }

    #[tokio::test]
    async fn test_remove_missing_id_is_a_no_op() {
        let (sync, store) = sync_over_memory();
        sync.add_to_wishlist("user-1", &entry("p1", "Generic Widget", "Sports", 10))
            .await
            .unwrap();
        let before = store.get_profile("user-1").await.unwrap().unwrap();

        sync.remove_from_wishlist("user-1", "p9").await.unwrap();
        let after = store.get_profile("user-1").await.unwrap().unwrap();
        assert_eq!(after.version, before.version);
    }

    #[tokio::test]
    async fn test_remove_on_absent_profile_creates_nothing() {
        let (sync, store) = sync_over_memory();
        sync.remove_from_wishlist("user-1", "p1").await.unwrap();
        assert!(store.get_profile("user-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_wishlist_creates_empty_profile_when_absent() {
        let (sync, store) = sync_over_memory();
        sync.clear_wishlist("user-1").await.unwrap();

        let versioned = store.get_profile("user-1").await.unwrap().unwrap();
        assert!(versioned.profile.wishlist.is_empty());
    }

    #[tokio::test]
    async fn test_clear_wishlist_keeps_purchases() {
        let (sync, store) = sync_over_memory();
        sync.add_to_wishlist("user-1", &entry("p1", "Generic Widget", "Sports", 10))
            .await
            .unwrap();
        sync.record_purchase("user-1", submission(Some("ord-1"), 30, "card"))
            .await
            .unwrap();

        sync.clear_wishlist("user-1").await.unwrap();

        let versioned = store.get_profile("user-1").await.unwrap().unwrap();
        assert!(versioned.profile.wishlist.is_empty());
        assert_eq!(versioned.profile.purchases.len(), 1);
    }

    #[tokio::test]
    async fn test_record_purchase_stamps_time_and_refreshes_summary() {
        let (sync, store) = sync_over_memory();
        let outcome = sync
            .record_purchase("user-1", submission(Some("ord-1"), 30, "card"))
            .await
            .unwrap();
        assert_eq!(outcome, PurchaseOutcome::Accepted);

        let versioned = store.get_profile("user-1").await.unwrap().unwrap();
        let profile = versioned.profile;
        assert_eq!(profile.purchases.len(), 1);
        let record = profile.purchases.first().unwrap();
        assert!(record.purchased_at <= Utc::now());
        assert_eq!(profile.budget_range.min, Decimal::from(30));
        assert_eq!(profile.budget_range.max, Decimal::from(30));
        assert_eq!(profile.preferred_payment_method.as_deref(), Some("card"));
    }

    #[tokio::test]
    async fn test_immediate_resubmission_is_duplicate() {
        let (sync, store) = sync_over_memory();
        sync.record_purchase("user-1", submission(Some("ord-1"), 30, "card"))
            .await
            .unwrap();

        let outcome = sync
            .record_purchase("user-1", submission(Some("ord-1"), 30, "card"))
            .await
            .unwrap();
        assert_eq!(outcome, PurchaseOutcome::Duplicate);

        let versioned = store.get_profile("user-1").await.unwrap().unwrap();
        assert_eq!(versioned.profile.purchases.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_purchases_both_recorded() {
        let (sync, store) = sync_over_memory();
        sync.record_purchase("user-1", submission(None, 30, "card"))
            .await
            .unwrap();
        sync.record_purchase("user-1", submission(None, 75, "cash"))
            .await
            .unwrap();

        let versioned = store.get_profile("user-1").await.unwrap().unwrap();
        let profile = versioned.profile;
        assert_eq!(profile.purchases.len(), 2);
        assert_eq!(profile.budget_range.min, Decimal::from(30));
        assert_eq!(profile.budget_range.max, Decimal::from(75));
        // Tie between card and cash resolves to the first seen.
        assert_eq!(profile.preferred_payment_method.as_deref(), Some("card"));
    }

    #[tokio::test]
    async fn test_sync_preferences_unknown_uid_is_not_found() {
        let (sync, _) = sync_over_memory();
        let err = sync.sync_preferences("user-1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_sync_preferences_persists_only_preference_lists() {
        let (sync, store) = sync_over_memory();
        sync.add_to_wishlist("user-1", &entry("p1", "Nike Jacket in Leather", "Clothes", 120))
            .await
            .unwrap();

        let preferences = sync.sync_preferences("user-1").await.unwrap();
        assert_eq!(preferences.categories, vec!["Clothes"]);
        assert_eq!(preferences.brands, vec!["Nike"]);
        assert_eq!(preferences.materials, vec!["Leather"]);

        let versioned = store.get_profile("user-1").await.unwrap().unwrap();
        assert_eq!(versioned.profile.preferences, preferences);
        assert_eq!(versioned.profile.budget_range, BudgetRange::default());
    }

    #[tokio::test]
    async fn test_preferences_shrink_after_removal() {
        let (sync, _) = sync_over_memory();
        sync.add_to_wishlist("user-1", &entry("p1", "Nike Jacket in Leather", "Clothes", 120))
            .await
            .unwrap();
        let first = sync.sync_preferences("user-1").await.unwrap();
        assert_eq!(first.categories, vec!["Clothes"]);

        sync.remove_from_wishlist("user-1", "p1").await.unwrap();
        let second = sync.sync_preferences("user-1").await.unwrap();
        assert!(second.categories.is_empty());
        assert!(second.brands.is_empty());
    }
}
