//! Profile store access.
//!
//! Persistence is an external collaborator behind the [`ProfileStore`]
//! trait: one read, one partial upsert, and two array appends, all with
//! creation-on-first-write defaults. Every mutation carries the version its
//! caller observed at read time; on a mismatch the store refuses the write
//! with [`StoreError::VersionConflict`] and the caller reruns its whole
//! read-modify-write cycle against fresh state.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use fincommerce_core::types::{
    BudgetRange, Preferences, PurchaseRecord, UserProfile, WishlistEntry,
};

/// Errors that can occur during profile store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored document no longer decodes into the profile schema.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The profile changed between the caller's read and this write.
    #[error("version conflict")]
    VersionConflict,
}

/// A profile together with the version token its read observed.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedProfile {
    pub profile: UserProfile,
    pub version: i64,
}

/// Partial update of a profile's overwritable fields.
///
/// Only populated members are written. `preferred_payment_method` is doubly
/// wrapped because clearing the stored value is itself an update, distinct
/// from leaving it alone.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub wishlist: Option<Vec<WishlistEntry>>,
    pub preferences: Option<Preferences>,
    pub budget_range: Option<BudgetRange>,
    pub preferred_payment_method: Option<Option<String>>,
}

/// Persistent store holding one profile document per user.
///
/// Writes create the profile with zeroed defaults when no document exists
/// for the uid yet. `expected` is the version the preceding read observed,
/// or `None` when the read found nothing; implementations reject writes
/// whose expectation no longer holds.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a profile by user id.
    async fn get_profile(&self, uid: &str) -> Result<Option<VersionedProfile>, StoreError>;

    /// Write the populated members of `fields`, creating the profile with
    /// defaults when absent.
    async fn upsert_fields(
        &self,
        uid: &str,
        fields: ProfileFields,
        expected: Option<i64>,
    ) -> Result<(), StoreError>;

    /// Append one entry to the wishlist array.
    async fn append_wishlist_entry(
        &self,
        uid: &str,
        entry: &WishlistEntry,
        expected: Option<i64>,
    ) -> Result<(), StoreError>;

    /// Append one record to the append-only purchase history.
    async fn append_purchase(
        &self,
        uid: &str,
        record: &PurchaseRecord,
        expected: Option<i64>,
    ) -> Result<(), StoreError>;

    /// Cheap connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
