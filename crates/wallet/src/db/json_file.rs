//! Voucher repository backed by a single JSON file.
//!
//! The file holds the whole collection as a JSON array and is rewritten on
//! every change. A missing file is an empty wallet.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gifticon_core::{Voucher, VoucherId};
use tokio::sync::Mutex;

use super::{RepositoryError, VoucherRepository, insert_into, update_in};

/// File name used inside the data directory.
pub const VOUCHERS_FILE: &str = "vouchers.json";

/// Vouchers persisted to `vouchers.json`.
pub struct JsonFileVoucherRepository {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileVoucherRepository {
    /// Store vouchers in `dir/vouchers.json`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(VOUCHERS_FILE),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<Voucher>, RepositoryError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&raw).map_err(|e| {
            RepositoryError::DataCorruption(format!("{}: {e}", self.path.display()))
        })
    }

    async fn write_all(&self, vouchers: &[Voucher]) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(vouchers)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        // Write to a sibling file first so a crash never leaves a torn file.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl VoucherRepository for JsonFileVoucherRepository {
    async fn list(&self) -> Result<Vec<Voucher>, RepositoryError> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    async fn get(&self, id: VoucherId) -> Result<Option<Voucher>, RepositoryError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.into_iter().find(|v| v.id == id))
    }

    async fn insert(&self, voucher: Voucher) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut vouchers = self.read_all().await?;
        insert_into(&mut vouchers, voucher)?;
        self.write_all(&vouchers).await
    }

    async fn update(&self, voucher: Voucher) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().await;
        let mut vouchers = self.read_all().await?;
        update_in(&mut vouchers, voucher)?;
        self.write_all(&vouchers).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use gifticon_core::{NewVoucher, Won};

    use super::*;

    fn voucher(id: i64, name: &str) -> Voucher {
        let mut input = NewVoucher::new(
            name,
            "맥도날드",
            Won::new(8900).expect("won"),
            NaiveDate::from_ymd_opt(2025, 7, 3).expect("date"),
        );
        input.barcode = Some("1234567890123".to_string());
        Voucher::from_new(
            VoucherId::new(id),
            Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).single().expect("time"),
            input,
        )
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileVoucherRepository::in_dir(dir.path());
        assert!(repo.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileVoucherRepository::in_dir(dir.path());
        repo.insert(voucher(1, "치킨버거 세트")).await.expect("insert");
        repo.insert(voucher(2, "빅맥 세트")).await.expect("insert");

        let mut used = voucher(1, "치킨버거 세트");
        used.is_used = true;
        used.notify_nearby = false;
        repo.update(used.clone()).await.expect("update");

        let reopened = JsonFileVoucherRepository::in_dir(dir.path());
        let all = reopened.list().await.expect("list");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], used);
        assert_eq!(all[1].name, "빅맥 세트");

        let raw = std::fs::read_to_string(reopened.path()).expect("read");
        assert!(raw.contains("\"expiryDate\": \"2025-07-03\""));
        assert!(raw.contains("\"isUsed\": true"));
    }

    #[tokio::test]
    async fn test_corrupted_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(VOUCHERS_FILE), "[{]").expect("write");
        let repo = JsonFileVoucherRepository::in_dir(dir.path());
        assert!(matches!(
            repo.list().await,
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonFileVoucherRepository::in_dir(dir.path());
        assert!(matches!(
            repo.update(voucher(5, "x")).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
