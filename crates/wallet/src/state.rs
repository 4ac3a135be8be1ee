//! Application state shared across handlers.

use std::sync::Arc;

use crate::clock::{SharedClock, SystemClock};
use crate::config::WalletConfig;
use crate::db::{JsonFileVoucherRepository, MemoryVoucherRepository, RepositoryError, VoucherRepository};
use crate::recognition::Recognizer;
use crate::services::VoucherManager;
use crate::settings::{
    JsonFileSettingsStore, MemorySettingsStore, OcrSettings, SettingsError, SettingsStore,
};

/// Errors that can occur while assembling the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("voucher storage: {0}")]
    Repository(#[from] RepositoryError),
    #[error("settings storage: {0}")]
    Settings(#[from] SettingsError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// voucher manager, the recognizer and the settings store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WalletConfig,
    vouchers: VoucherManager,
    recognizer: Recognizer,
    settings: Arc<dyn SettingsStore>,
}

impl AppState {
    /// Build state from configuration using the system clock.
    ///
    /// Storage is JSON files in the data directory when one is configured,
    /// otherwise in memory. OCR settings from the environment are saved into
    /// the settings store, and sample vouchers are seeded when enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the stores cannot be read or written.
    pub async fn from_config(config: WalletConfig) -> Result<Self, StateError> {
        let (repo, settings): (Arc<dyn VoucherRepository>, Arc<dyn SettingsStore>) =
            match &config.data_dir {
                Some(dir) => (
                    Arc::new(JsonFileVoucherRepository::in_dir(dir)),
                    Arc::new(JsonFileSettingsStore::in_dir(dir)),
                ),
                None => (
                    Arc::new(MemoryVoucherRepository::new()),
                    Arc::new(MemorySettingsStore::new()),
                ),
            };

        if let Some(ocr) = config.ocr().cloned() {
            tracing::info!(provider = %ocr.provider, "Using OCR provider from environment");
            settings.save(OcrSettings::from(ocr)).await?;
        }

        let state = Self::new(config, repo, settings, Arc::new(SystemClock));

        if state.config().seed_samples {
            state.vouchers().seed_samples().await?;
        }
        state.vouchers().refresh().await?;

        Ok(state)
    }

    /// Build state from explicit parts.
    #[must_use]
    pub fn new(
        config: WalletConfig,
        repo: Arc<dyn VoucherRepository>,
        settings: Arc<dyn SettingsStore>,
        clock: SharedClock,
    ) -> Self {
        let recognizer = Recognizer::new(settings.clone(), config.endpoints.clone(), clock.clone());
        Self::with_recognizer(config, repo, settings, clock, recognizer)
    }

    /// Build state with a preconfigured recognizer (e.g. a seeded placeholder).
    #[must_use]
    pub fn with_recognizer(
        config: WalletConfig,
        repo: Arc<dyn VoucherRepository>,
        settings: Arc<dyn SettingsStore>,
        clock: SharedClock,
        recognizer: Recognizer,
    ) -> Self {
        let vouchers = VoucherManager::new(repo, clock, config.notify_window_days);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                vouchers,
                recognizer,
                settings,
            }),
        }
    }

    /// Get a reference to the wallet configuration.
    #[must_use]
    pub fn config(&self) -> &WalletConfig {
        &self.inner.config
    }

    /// Get a reference to the voucher manager.
    #[must_use]
    pub fn vouchers(&self) -> &VoucherManager {
        &self.inner.vouchers
    }

    /// Get a reference to the image recognizer.
    #[must_use]
    pub fn recognizer(&self) -> &Recognizer {
        &self.inner.recognizer
    }

    /// Get a reference to the OCR settings store.
    #[must_use]
    pub fn settings(&self) -> &Arc<dyn SettingsStore> {
        &self.inner.settings
    }
}
