//! Wishlist mutation handlers.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;

use fincommerce_core::types::WishlistEntry;

use super::{Ack, AppJson, UidRequest};
use crate::error::Result;
use crate::state::AppState;

/// Request to save a product to a user's wishlist.
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub uid: String,
    pub product: WishlistEntry,
}

/// Request to drop a product from a user's wishlist.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    pub uid: String,
    pub product_id: String,
}

/// Save a product to the wishlist.
///
/// POST /api/wishlist/add
///
/// Creates the profile on first contact; re-adding a saved product succeeds
/// without a write.
#[instrument(skip(state, req), fields(uid = %req.uid, product_id = %req.product.id))]
pub async fn add(
    State(state): State<AppState>,
    AppJson(req): AppJson<AddRequest>,
) -> Result<Json<Ack>> {
    state.sync().add_to_wishlist(&req.uid, &req.product).await?;
    Ok(Json(Ack::ok()))
}

/// Drop a product from the wishlist.
///
/// POST /api/wishlist/remove
///
/// Unknown uids and unsaved products are acknowledged without effect.
#[instrument(skip(state, req), fields(uid = %req.uid, product_id = %req.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    AppJson(req): AppJson<RemoveRequest>,
) -> Result<Json<Ack>> {
    state
        .sync()
        .remove_from_wishlist(&req.uid, &req.product_id)
        .await?;
    Ok(Json(Ack::ok()))
}

/// Empty the wishlist.
///
/// POST /api/wishlist/clear
#[instrument(skip(state, req), fields(uid = %req.uid))]
pub async fn clear(
    State(state): State<AppState>,
    AppJson(req): AppJson<UidRequest>,
) -> Result<Json<Ack>> {
    state.sync().clear_wishlist(&req.uid).await?;
    Ok(Json(Ack::ok()))
}
