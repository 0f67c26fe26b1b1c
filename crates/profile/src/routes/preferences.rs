//! Preference summary handlers.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use fincommerce_core::types::{BudgetRange, Preferences};

use super::{AppJson, AppQuery, UidRequest};
use crate::error::Result;
use crate::state::AppState;

/// Query naming the profile owner.
#[derive(Debug, Deserialize)]
pub struct ShowQuery {
    pub uid: String,
}

/// Read-only preference summary plus profile metadata.
///
/// The raw wishlist and purchase arrays stay server-side; search
/// personalization needs only the derived fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesView {
    pub uid: String,
    pub budget_range: BudgetRange,
    pub preferences: Preferences,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read the stored preference summary.
///
/// GET /api/preferences?uid=...
///
/// # Errors
///
/// 404 when no profile exists for `uid`.
#[instrument(skip(state, query), fields(uid = %query.uid))]
pub async fn show(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ShowQuery>,
) -> Result<Json<PreferencesView>> {
    let profile = state.sync().get_profile(&query.uid).await?;
    Ok(Json(PreferencesView {
        uid: profile.uid,
        budget_range: profile.budget_range,
        preferences: profile.preferences,
        preferred_payment_method: profile.preferred_payment_method,
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    }))
}

/// Recompute and persist the preference sets from current history.
///
/// POST /api/preferences/sync
///
/// Returns the freshly computed sets.
///
/// # Errors
///
/// 404 when no profile exists for `uid`.
#[instrument(skip(state, req), fields(uid = %req.uid))]
pub async fn sync(
    State(state): State<AppState>,
    AppJson(req): AppJson<UidRequest>,
) -> Result<Json<Preferences>> {
    let preferences = state.sync().sync_preferences(&req.uid).await?;
    Ok(Json(preferences))
}
