//! Gifticon Core - Shared types library.
//!
//! This crate provides common types used across all Gifticon Wallet components:
//! - `wallet` - Voucher manager, recognition adapter and JSON API server
//! - `cli` - Command-line tools for managing a local voucher wallet
//!
//! # Architecture
//!
//! The core crate contains only types and lookup tables - no I/O, no clock
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for voucher ids and amounts, voucher records,
//!   recognition results, statuses and store categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
