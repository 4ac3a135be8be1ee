//! OCR provider settings endpoints.
//!
//! The API key is write-only: responses only say whether one is stored.

use axum::{Json, extract::State, http::StatusCode};
use gifticon_core::OcrProvider;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::settings::OcrSettings;
use crate::state::AppState;

/// Settings as shown on the settings screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrSettingsView {
    pub provider: Option<OcrProvider>,
    pub has_api_key: bool,
}

impl From<Option<OcrSettings>> for OcrSettingsView {
    fn from(settings: Option<OcrSettings>) -> Self {
        Self {
            provider: settings.as_ref().map(|s| s.provider),
            has_api_key: settings.is_some(),
        }
    }
}

/// Settings form submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrSettingsInput {
    pub provider: Option<String>,
    pub api_key: Option<String>,
}

/// Current OCR settings.
///
/// GET /api/settings/ocr
///
/// # Errors
///
/// Returns `AppError` if the settings store cannot be read.
pub async fn show(State(state): State<AppState>) -> Result<Json<OcrSettingsView>, AppError> {
    Ok(Json(state.settings().load().await?.into()))
}

/// Save OCR settings. Provider and key are both required.
///
/// PUT /api/settings/ocr
///
/// # Errors
///
/// Returns `AppError::Settings(Incomplete)` if either field is missing.
pub async fn update(
    State(state): State<AppState>,
    Json(input): Json<OcrSettingsInput>,
) -> Result<Json<OcrSettingsView>, AppError> {
    let settings = OcrSettings::from_input(input.provider.as_deref(), input.api_key.as_deref())?;
    state.settings().save(settings.clone()).await?;
    tracing::info!(provider = %settings.provider, "OCR settings updated");
    Ok(Json(Some(settings).into()))
}

/// Remove OCR settings; recognition falls back to placeholders.
///
/// DELETE /api/settings/ocr
///
/// # Errors
///
/// Returns `AppError` if the settings store cannot be written.
pub async fn clear(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.settings().clear().await?;
    Ok(StatusCode::NO_CONTENT)
}
