//! Business logic services for the wallet.
//!
//! # Services
//!
//! - `vouchers` - Voucher collection, partitions, reminders and selection
//! - `scan` - Camera and gallery registration flows
//! - `share` - Clipboard, KakaoTalk and e-mail share texts

pub mod scan;
pub mod share;
pub mod vouchers;

pub use scan::{GalleryResult, RegistrationDraft, ScanError, scan_gallery, scan_single};
pub use share::{ShareContent, share_content};
pub use vouchers::{Partitions, VoucherDetail, VoucherManager, sample_vouchers};
