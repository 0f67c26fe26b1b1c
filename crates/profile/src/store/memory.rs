//! In-memory profile store.
//!
//! Backs the test suites and local development without Postgres. Semantics
//! mirror [`PgProfileStore`](super::postgres::PgProfileStore): creation on
//! first write, version bump and `updated_at` refresh on every mutation,
//! version conflicts on stale expectations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use fincommerce_core::types::{PurchaseRecord, UserProfile, WishlistEntry};

use super::{ProfileFields, ProfileStore, StoreError, VersionedProfile};

/// Profile store holding every document in process memory.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, Stored>>,
}

#[derive(Debug, Clone)]
struct Stored {
    profile: UserProfile,
    version: i64,
}

impl MemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `mutate` to the stored profile under the version check,
    /// creating the profile first when absent.
    async fn with_profile<F>(
        &self,
        uid: &str,
        expected: Option<i64>,
        mutate: F,
    ) -> Result<(), StoreError>
    where
        F: FnOnce(&mut UserProfile),
    {
        let mut profiles = self.profiles.write().await;
        let now = Utc::now();

        match profiles.get_mut(uid) {
            Some(stored) => {
                if expected != Some(stored.version) {
                    return Err(StoreError::VersionConflict);
                }
                mutate(&mut stored.profile);
                stored.profile.updated_at = now;
                stored.version += 1;
            }
            None => {
                if expected.is_some() {
                    return Err(StoreError::VersionConflict);
                }
                let mut profile = UserProfile::new(uid, now);
                mutate(&mut profile);
                profiles.insert(uid.to_owned(), Stored { profile, version: 0 });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<VersionedProfile>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(uid).map(|stored| VersionedProfile {
            profile: stored.profile.clone(),
            version: stored.version,
        }))
    }

    async fn upsert_fields(
        &self,
        uid: &str,
        fields: ProfileFields,
        expected: Option<i64>,
    ) -> Result<(), StoreError> {
        self.with_profile(uid, expected, |profile| {
            if let Some(wishlist) = fields.wishlist {
                profile.wishlist = wishlist;
            }
            if let Some(preferences) = fields.preferences {
                profile.preferences = preferences;
            }
            if let Some(budget_range) = fields.budget_range {
                profile.budget_range = budget_range;
            }
            if let Some(method) = fields.preferred_payment_method {
                profile.preferred_payment_method = method;
            }
        })
        .await
    }

    async fn append_wishlist_entry(
        &self,
        uid: &str,
        entry: &WishlistEntry,
        expected: Option<i64>,
    ) -> Result<(), StoreError> {
        let entry = entry.clone();
        self.with_profile(uid, expected, move |profile| profile.wishlist.push(entry))
            .await
    }

    async fn append_purchase(
        &self,
        uid: &str,
        record: &PurchaseRecord,
        expected: Option<i64>,
    ) -> Result<(), StoreError> {
        let record = record.clone();
        self.with_profile(uid, expected, move |profile| profile.purchases.push(record))
            .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
