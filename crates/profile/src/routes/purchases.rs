//! Purchase recording handlers.

use axum::Json;
use axum::extract::State;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use fincommerce_core::types::PurchaseItem;

use super::AppJson;
use crate::error::Result;
use crate::state::AppState;
use crate::sync::{PurchaseOutcome, PurchaseSubmission};

/// A completed checkout handed over by the payment flow.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    pub uid: String,
    #[serde(default)]
    pub order_id: Option<String>,
    pub items: Vec<PurchaseItem>,
    pub total: Decimal,
    pub payment_method: String,
}

/// Response for a purchase submission.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<bool>,
}

/// Record a completed purchase.
///
/// POST /api/purchases
///
/// Resubmissions of the same checkout within the dedup window come back as
/// `{"success": false, "duplicate": true}` and leave the history untouched.
#[instrument(skip(state, req), fields(uid = %req.uid, order_id = ?req.order_id))]
pub async fn record(
    State(state): State<AppState>,
    AppJson(req): AppJson<RecordRequest>,
) -> Result<Json<RecordResponse>> {
    let submission = PurchaseSubmission {
        order_id: req.order_id,
        items: req.items,
        total: req.total,
        payment_method: req.payment_method,
    };

    let response = match state.sync().record_purchase(&req.uid, submission).await? {
        PurchaseOutcome::Accepted => RecordResponse {
            success: true,
            duplicate: None,
        },
        PurchaseOutcome::Duplicate => RecordResponse {
            success: false,
            duplicate: Some(true),
        },
    };
    Ok(Json(response))
}
