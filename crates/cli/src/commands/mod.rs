//! CLI command implementations.
//!
//! Every command works on the wallet stored in `GIFTICON_DATA_DIR`
//! (`./data` when unset): `vouchers.json` and `settings.json`.

pub mod scan;
pub mod settings;
pub mod vouchers;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use gifticon_wallet::AppState;
use gifticon_wallet::clock::SystemClock;
use gifticon_wallet::config::{ConfigError, WalletConfig};
use gifticon_wallet::db::{JsonFileVoucherRepository, RepositoryError};
use gifticon_wallet::settings::JsonFileSettingsStore;
use thiserror::Error;
use tracing::debug;

/// Data directory used when `GIFTICON_DATA_DIR` is not set.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Errors from opening the local wallet.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("voucher storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Open the wallet in the configured data directory.
///
/// OCR settings are read from `settings.json` only; use
/// `gifticon settings set` to change them.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the voucher file
/// cannot be read.
pub async fn open_wallet() -> Result<AppState, OpenError> {
    let mut config = WalletConfig::from_env()?;
    let dir = config
        .data_dir
        .get_or_insert_with(|| PathBuf::from(DEFAULT_DATA_DIR))
        .clone();
    debug!(data_dir = %dir.display(), "Opening wallet");

    let state = AppState::new(
        config,
        Arc::new(JsonFileVoucherRepository::in_dir(&dir)),
        Arc::new(JsonFileSettingsStore::in_dir(&dir)),
        Arc::new(SystemClock),
    );
    state.vouchers().refresh().await?;
    Ok(state)
}

/// Write lines to stdout.
pub(crate) fn print_lines<I, S>(lines: I) -> io::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    Ok(())
}
