//! Gifticon Wallet library.
//!
//! This crate provides the wallet functionality as a library, allowing it to
//! be tested and reused by the server binary and the CLI.
//!
//! # Modules
//!
//! - [`expiry`] - Expiry badge classification against the current date
//! - [`notifications`] - Expiry reminder sentences
//! - [`recognition`] - OCR providers, placeholder fallback and image checks
//! - [`services`] - Voucher manager, scan flows and share texts
//! - [`db`] / [`settings`] - Voucher and OCR settings storage
//! - [`routes`] - JSON API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod expiry;
pub mod notifications;
pub mod recognition;
pub mod routes;
pub mod services;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use state::AppState;
