//! OCR settings commands.
//!
//! # Usage
//!
//! ```bash
//! gifticon settings set -p google -k AIza...
//! gifticon settings show
//! gifticon settings clear
//! ```

use gifticon_core::OcrProvider;
use gifticon_wallet::AppState;
use gifticon_wallet::settings::{OcrSettings, SettingsError};
use thiserror::Error;
use tracing::info;

use super::print_lines;

/// Errors from settings commands.
#[derive(Debug, Error)]
pub enum SettingsCommandError {
    #[error("{0}")]
    Settings(#[from] SettingsError),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Providers `settings set -p` accepts.
fn available_providers() -> String {
    let names: Vec<String> = OcrProvider::ALL
        .iter()
        .map(|provider| format!("{provider} ({})", provider.label()))
        .collect();
    format!("Available: {}", names.join(", "))
}

/// Print the saved provider. The key itself is never printed.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read.
pub async fn show(wallet: &AppState) -> Result<(), SettingsCommandError> {
    let line = match wallet.settings().load().await? {
        Some(settings) => format!(
            "{} ({}), API key saved",
            settings.provider.label(),
            settings.provider
        ),
        None => "No OCR provider configured; scans return placeholder values".to_string(),
    };
    Ok(print_lines([line, available_providers()])?)
}

/// Save provider and API key.
///
/// # Errors
///
/// Returns an error if either value is blank, the provider is unknown, or the
/// settings file cannot be written.
pub async fn set(wallet: &AppState, provider: &str, api_key: &str) -> Result<(), SettingsCommandError> {
    let settings = OcrSettings::from_input(Some(provider), Some(api_key))?;
    let provider = settings.provider;
    wallet.settings().save(settings).await?;
    info!(%provider, "OCR settings saved");
    Ok(())
}

/// Remove saved settings.
///
/// # Errors
///
/// Returns an error if the settings file cannot be removed.
pub async fn clear(wallet: &AppState) -> Result<(), SettingsCommandError> {
    wallet.settings().clear().await?;
    info!("OCR settings cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_providers_lists_all_in_order() {
        assert_eq!(
            available_providers(),
            "Available: openai (OpenAI GPT-4 Vision), google (Google Cloud Vision), \
             aws (AWS Textract), azure (Azure Computer Vision)"
        );
    }
}
