//! Core types for Gifticon Wallet.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod amount;
pub mod category;
pub mod extracted;
pub mod id;
pub mod status;
pub mod voucher;

pub use amount::{AmountError, Won};
pub use category::{StoreCategory, category_for_store, category_icon, store_categories};
pub use extracted::ExtractedInfo;
pub use id::*;
pub use status::*;
pub use voucher::{NewVoucher, Voucher};
