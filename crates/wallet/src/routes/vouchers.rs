//! Voucher list, registration, detail and mutation endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use gifticon_core::{NewVoucher, Voucher, VoucherId};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::{ShareContent, VoucherDetail, share_content};
use crate::state::AppState;

/// The list screen: partitions plus current reminders.
#[derive(Debug, Serialize)]
pub struct VoucherList {
    pub active: Vec<Voucher>,
    pub used: Vec<Voucher>,
    pub expired: Vec<Voucher>,
    pub notifications: Vec<String>,
}

/// List vouchers split into active, used and expired.
///
/// GET /api/vouchers
///
/// # Errors
///
/// Returns `AppError` if storage cannot be read.
pub async fn index(State(state): State<AppState>) -> Result<Json<VoucherList>, AppError> {
    let partitions = state.vouchers().partitions().await?;
    let notifications = state.vouchers().notifications().await?;
    Ok(Json(VoucherList {
        active: partitions.active,
        used: partitions.used,
        expired: partitions.expired,
        notifications,
    }))
}

/// Register a voucher.
///
/// POST /api/vouchers
///
/// # Errors
///
/// Returns `AppError` if the voucher cannot be stored.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewVoucher>,
) -> Result<(StatusCode, Json<Voucher>), AppError> {
    if input.name.trim().is_empty() || input.store.trim().is_empty() {
        return Err(AppError::BadRequest("name and store are required".to_string()));
    }
    let voucher = state.vouchers().add(input).await?;
    Ok((StatusCode::CREATED, Json(voucher)))
}

/// Voucher detail with badge and redeemability. Opens the detail view.
///
/// GET /api/vouchers/{id}
///
/// # Errors
///
/// Returns `AppError::Repository(NotFound)` for an unknown id.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<VoucherId>,
) -> Result<Json<VoucherDetail>, AppError> {
    state.vouchers().select(id).await?;
    Ok(Json(state.vouchers().detail(id).await?))
}

/// The voucher open in the detail view, if any.
///
/// GET /api/vouchers/selected
///
/// # Errors
///
/// Returns `AppError` if storage cannot be read.
pub async fn selected(State(state): State<AppState>) -> Result<Json<Option<Voucher>>, AppError> {
    Ok(Json(state.vouchers().selected().await?))
}

/// Close the detail view.
///
/// DELETE /api/vouchers/selected
pub async fn close(State(state): State<AppState>) -> StatusCode {
    state.vouchers().clear_selection().await;
    StatusCode::NO_CONTENT
}

/// Mark a voucher used.
///
/// POST /api/vouchers/{id}/use
///
/// # Errors
///
/// Returns `AppError::Repository(NotFound)` for an unknown id.
pub async fn mark_used(
    State(state): State<AppState>,
    Path(id): Path<VoucherId>,
) -> Result<Json<Voucher>, AppError> {
    Ok(Json(state.vouchers().mark_used(id).await?))
}

/// Toggle the nearby-store notification preference.
///
/// POST /api/vouchers/{id}/notification
///
/// # Errors
///
/// Returns `AppError::Repository(NotFound)` for an unknown id.
pub async fn toggle_notification(
    State(state): State<AppState>,
    Path(id): Path<VoucherId>,
) -> Result<Json<Voucher>, AppError> {
    Ok(Json(state.vouchers().toggle_notification(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    /// Optional note for the recipient.
    pub message: Option<String>,
}

/// Share texts for a voucher.
///
/// GET /api/vouchers/{id}/share?message=...
///
/// # Errors
///
/// Returns `AppError::Repository(NotFound)` for an unknown id.
pub async fn share(
    State(state): State<AppState>,
    Path(id): Path<VoucherId>,
    Query(query): Query<ShareQuery>,
) -> Result<Json<ShareContent>, AppError> {
    let voucher = state.vouchers().get(id).await?;
    Ok(Json(share_content(&voucher, query.message.as_deref())))
}

/// Current expiry reminders.
///
/// GET /api/notifications
///
/// # Errors
///
/// Returns `AppError` if storage cannot be read.
pub async fn notifications(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.vouchers().notifications().await?))
}
