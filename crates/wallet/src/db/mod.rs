//! Voucher storage.
//!
//! # Backends
//!
//! - [`MemoryVoucherRepository`] - process lifetime only (default)
//! - [`JsonFileVoucherRepository`] - `vouchers.json` in the data directory
//!
//! Vouchers are never deleted; the only writes are inserts and whole-record
//! updates. Listing preserves insertion order.

pub mod json_file;
pub mod memory;

use async_trait::async_trait;
use gifticon_core::{Voucher, VoucherId};
use thiserror::Error;

pub use json_file::JsonFileVoucherRepository;
pub use memory::MemoryVoucherRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing the backing file failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be parsed.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested voucher was not found.
    #[error("not found")]
    NotFound,

    /// A voucher with the same id already exists.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence for vouchers.
#[async_trait]
pub trait VoucherRepository: Send + Sync {
    /// All vouchers in insertion order.
    async fn list(&self) -> Result<Vec<Voucher>, RepositoryError>;

    /// Look up a voucher by id.
    async fn get(&self, id: VoucherId) -> Result<Option<Voucher>, RepositoryError>;

    /// Append a new voucher.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id is taken.
    async fn insert(&self, voucher: Voucher) -> Result<(), RepositoryError>;

    /// Replace an existing voucher.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no voucher has this id.
    async fn update(&self, voucher: Voucher) -> Result<(), RepositoryError>;
}

/// Shared insert logic for list-backed stores.
fn insert_into(vouchers: &mut Vec<Voucher>, voucher: Voucher) -> Result<(), RepositoryError> {
    if vouchers.iter().any(|v| v.id == voucher.id) {
        return Err(RepositoryError::Conflict(format!(
            "voucher {} already exists",
            voucher.id
        )));
    }
    vouchers.push(voucher);
    Ok(())
}

/// Shared update logic for list-backed stores.
fn update_in(vouchers: &mut [Voucher], voucher: Voucher) -> Result<(), RepositoryError> {
    let slot = vouchers
        .iter_mut()
        .find(|v| v.id == voucher.id)
        .ok_or(RepositoryError::NotFound)?;
    *slot = voucher;
    Ok(())
}
