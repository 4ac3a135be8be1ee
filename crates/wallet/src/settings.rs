//! OCR provider settings.
//!
//! The provider and API key entered on the settings screen. Recognition reads
//! them at call time, so a change takes effect on the next scan.
//!
//! # File format
//!
//! `settings.json` in the data directory:
//!
//! ```json
//! { "provider": "openai", "apiKey": "sk-..." }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gifticon_core::OcrProvider;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::OcrConfig;

/// File name used by [`JsonFileSettingsStore`].
pub const SETTINGS_FILE: &str = "settings.json";

/// Errors that can occur when reading or writing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Provider or API key missing.
    #[error("both an OCR provider and an API key are required")]
    Incomplete,

    /// Provider name not recognised.
    #[error("{0}")]
    InvalidProvider(String),

    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is corrupted: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stored OCR provider credentials.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct OcrSettings {
    pub provider: OcrProvider,
    pub api_key: SecretString,
}

impl std::fmt::Debug for OcrSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrSettings")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OcrSettings {
    /// Validate form input. Both fields are required; the key is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Incomplete` if either value is missing or blank,
    /// or `SettingsError::InvalidProvider` for an unknown provider name.
    pub fn from_input(provider: Option<&str>, api_key: Option<&str>) -> Result<Self, SettingsError> {
        let provider = provider.map(str::trim).filter(|p| !p.is_empty());
        let api_key = api_key.map(str::trim).filter(|k| !k.is_empty());

        let (Some(provider), Some(api_key)) = (provider, api_key) else {
            return Err(SettingsError::Incomplete);
        };

        let provider = provider
            .parse::<OcrProvider>()
            .map_err(SettingsError::InvalidProvider)?;

        Ok(Self {
            provider,
            api_key: SecretString::from(api_key.to_string()),
        })
    }
}

impl From<OcrConfig> for OcrSettings {
    fn from(config: OcrConfig) -> Self {
        Self {
            provider: config.provider,
            api_key: config.api_key,
        }
    }
}

/// Persistence for [`OcrSettings`].
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current settings, or `None` if none were saved.
    async fn load(&self) -> Result<Option<OcrSettings>, SettingsError>;

    /// Replace the stored settings.
    async fn save(&self, settings: OcrSettings) -> Result<(), SettingsError>;

    /// Forget the stored settings.
    async fn clear(&self) -> Result<(), SettingsError>;
}

/// Settings kept for the lifetime of the process.
#[derive(Default)]
pub struct MemorySettingsStore {
    settings: RwLock<Option<OcrSettings>>,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `settings` already saved.
    #[must_use]
    pub fn with_settings(settings: OcrSettings) -> Self {
        Self {
            settings: RwLock::new(Some(settings)),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Option<OcrSettings>, SettingsError> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: OcrSettings) -> Result<(), SettingsError> {
        *self.settings.write().await = Some(settings);
        Ok(())
    }

    async fn clear(&self) -> Result<(), SettingsError> {
        *self.settings.write().await = None;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    provider: OcrProvider,
    api_key: String,
}

/// Settings persisted to `settings.json`.
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    /// Store settings in `dir/settings.json`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SETTINGS_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load(&self) -> Result<Option<OcrSettings>, SettingsError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredSettings = serde_json::from_slice(&raw)?;
        Ok(Some(OcrSettings {
            provider: stored.provider,
            api_key: SecretString::from(stored.api_key),
        }))
    }

    async fn save(&self, settings: OcrSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let stored = StoredSettings {
            provider: settings.provider,
            api_key: settings.api_key.expose_secret().to_string(),
        };
        let json = serde_json::to_vec_pretty(&stored)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::info!(provider = %settings.provider, "Saved OCR settings");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SettingsError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_requires_both_fields() {
        assert!(matches!(
            OcrSettings::from_input(Some("openai"), None),
            Err(SettingsError::Incomplete)
        ));
        assert!(matches!(
            OcrSettings::from_input(None, Some("key")),
            Err(SettingsError::Incomplete)
        ));
        assert!(matches!(
            OcrSettings::from_input(Some("openai"), Some("   ")),
            Err(SettingsError::Incomplete)
        ));
    }

    #[test]
    fn test_from_input_rejects_unknown_provider() {
        assert!(matches!(
            OcrSettings::from_input(Some("tesseract"), Some("key")),
            Err(SettingsError::InvalidProvider(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let settings = OcrSettings::from_input(Some("google"), Some("AIza-secret")).expect("settings");
        let debug = format!("{settings:?}");
        assert!(!debug.contains("AIza-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_memory_store_save_load_clear() {
        let store = MemorySettingsStore::new();
        assert!(store.load().await.expect("load").is_none());

        let settings = OcrSettings::from_input(Some("aws"), Some("key")).expect("settings");
        store.save(settings).await.expect("save");
        let loaded = store.load().await.expect("load").expect("saved");
        assert_eq!(loaded.provider, OcrProvider::Aws);
        assert_eq!(loaded.api_key.expose_secret(), "key");

        store.clear().await.expect("clear");
        assert!(store.load().await.expect("load").is_none());
    }

    #[tokio::test]
    async fn test_json_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileSettingsStore::in_dir(dir.path());
        assert!(store.load().await.expect("load").is_none());

        let settings = OcrSettings::from_input(Some("openai"), Some("sk-test")).expect("settings");
        store.save(settings).await.expect("save");

        let reopened = JsonFileSettingsStore::in_dir(dir.path());
        let loaded = reopened.load().await.expect("load").expect("saved");
        assert_eq!(loaded.provider, OcrProvider::OpenAi);
        assert_eq!(loaded.api_key.expose_secret(), "sk-test");

        let raw = std::fs::read_to_string(reopened.path()).expect("read");
        assert!(raw.contains("\"apiKey\""));

        reopened.clear().await.expect("clear");
        reopened.clear().await.expect("clear twice");
        assert!(reopened.load().await.expect("load").is_none());
    }

    #[tokio::test]
    async fn test_json_file_store_reports_corruption() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(SETTINGS_FILE), "{not json").expect("write");
        let store = JsonFileSettingsStore::in_dir(dir.path());
        assert!(matches!(store.load().await, Err(SettingsError::Serialization(_))));
    }
}
