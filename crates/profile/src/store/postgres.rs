//! Postgres-backed profile store.
//!
//! # Table: `user_profile`
//!
//! One row per uid. The source arrays and derived projections live in JSONB
//! columns so partial upserts and array appends stay single statements, and
//! `version` carries the compare-and-swap token the orchestrator's retry
//! loop relies on. Every statement here either inserts the row with
//! defaults or updates it under `WHERE version = expected`; zero affected
//! rows means the expectation no longer holds.
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/profile/migrations/` and run at
//! service startup via [`PgProfileStore::migrate`].

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgQueryResult, PgRow};

use fincommerce_core::types::{PurchaseRecord, UserProfile, WishlistEntry};

use super::{ProfileFields, ProfileStore, StoreError, VersionedProfile};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Profile store backed by the `user_profile` table.
#[derive(Debug, Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| StoreError::Database(err.into()))
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<VersionedProfile>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT uid, wishlist, purchases, preferences, budget_range,
                   preferred_payment_method, version, created_at, updated_at
            FROM user_profile
            WHERE uid = $1
            ",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(decode_profile).transpose()
    }

    async fn upsert_fields(
        &self,
        uid: &str,
        fields: ProfileFields,
        expected: Option<i64>,
    ) -> Result<(), StoreError> {
        let wishlist = fields
            .wishlist
            .as_ref()
            .map(|value| to_json(value, "wishlist"))
            .transpose()?;
        let preferences = fields
            .preferences
            .as_ref()
            .map(|value| to_json(value, "preferences"))
            .transpose()?;
        let budget_range = fields
            .budget_range
            .as_ref()
            .map(|value| to_json(value, "budget range"))
            .transpose()?;
        // Presence flag and flattened value, so the statement can tell
        // "leave alone" apart from "set to NULL".
        let set_payment_method = fields.preferred_payment_method.is_some();
        let payment_method = fields.preferred_payment_method.flatten();

        let result = sqlx::query(
            r#"
            INSERT INTO user_profile (uid, wishlist, preferences, budget_range, preferred_payment_method)
            VALUES (
                $1,
                COALESCE($2, '[]'::jsonb),
                COALESCE($3, '{"categories":[],"brands":[],"materials":[]}'::jsonb),
                COALESCE($4, '{"min":0,"max":0}'::jsonb),
                $5
            )
            ON CONFLICT (uid) DO UPDATE SET
                wishlist = COALESCE($2, user_profile.wishlist),
                preferences = COALESCE($3, user_profile.preferences),
                budget_range = COALESCE($4, user_profile.budget_range),
                preferred_payment_method = CASE WHEN $6 THEN $5
                                                ELSE user_profile.preferred_payment_method END,
                version = user_profile.version + 1,
                updated_at = now()
            WHERE user_profile.version = COALESCE($7, -1)
            "#,
        )
        .bind(uid)
        .bind(wishlist)
        .bind(preferences)
        .bind(budget_range)
        .bind(payment_method)
        .bind(set_payment_method)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        check_version(&result)
    }

    async fn append_wishlist_entry(
        &self,
        uid: &str,
        entry: &WishlistEntry,
        expected: Option<i64>,
    ) -> Result<(), StoreError> {
        let entry = to_json(entry, "wishlist entry")?;

        let result = sqlx::query(
            r"
            INSERT INTO user_profile (uid, wishlist)
            VALUES ($1, jsonb_build_array($2))
            ON CONFLICT (uid) DO UPDATE SET
                wishlist = user_profile.wishlist || $2,
                version = user_profile.version + 1,
                updated_at = now()
            WHERE user_profile.version = COALESCE($3, -1)
            ",
        )
        .bind(uid)
        .bind(entry)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        check_version(&result)
    }

    async fn append_purchase(
        &self,
        uid: &str,
        record: &PurchaseRecord,
        expected: Option<i64>,
    ) -> Result<(), StoreError> {
        let record = to_json(record, "purchase record")?;

        let result = sqlx::query(
            r"
            INSERT INTO user_profile (uid, purchases)
            VALUES ($1, jsonb_build_array($2))
            ON CONFLICT (uid) DO UPDATE SET
                purchases = user_profile.purchases || $2,
                version = user_profile.version + 1,
                updated_at = now()
            WHERE user_profile.version = COALESCE($3, -1)
            ",
        )
        .bind(uid)
        .bind(record)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        check_version(&result)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Zero affected rows means the version expectation failed.
fn check_version(result: &PgQueryResult) -> Result<(), StoreError> {
    if result.rows_affected() == 0 {
        return Err(StoreError::VersionConflict);
    }
    Ok(())
}

fn decode_profile(row: &PgRow) -> Result<VersionedProfile, StoreError> {
    let profile = UserProfile {
        uid: row.try_get("uid")?,
        wishlist: from_json(row.try_get("wishlist")?, "wishlist")?,
        purchases: from_json(row.try_get("purchases")?, "purchases")?,
        preferences: from_json(row.try_get("preferences")?, "preferences")?,
        budget_range: from_json(row.try_get("budget_range")?, "budget range")?,
        preferred_payment_method: row.try_get("preferred_payment_method")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    };
    Ok(VersionedProfile {
        profile,
        version: row.try_get("version")?,
    })
}

fn from_json<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    what: &str,
) -> Result<T, StoreError> {
    serde_json::from_value(value)
        .map_err(|err| StoreError::DataCorruption(format!("invalid {what} document: {err}")))
}

fn to_json<T: serde::Serialize>(value: &T, what: &str) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value)
        .map_err(|err| StoreError::DataCorruption(format!("failed to serialize {what}: {err}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fincommerce_core::types::Preferences;

    #[test]
    fn test_from_json_reports_corruption() {
        let result: Result<Preferences, StoreError> =
            from_json(serde_json::json!({"categories": 42}), "preferences");
        assert!(matches!(result, Err(StoreError::DataCorruption(_))));
    }

    #[test]
    fn test_from_json_decodes_valid_document() {
        let preferences: Preferences = from_json(
            serde_json::json!({"categories": ["Audio"], "brands": [], "materials": []}),
            "preferences",
        )
        .unwrap();
        assert_eq!(preferences.categories, vec!["Audio"]);
    }
}
