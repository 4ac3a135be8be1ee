//! Expiry classification.
//!
//! Maps a voucher's expiry date and used flag to a badge. Dates are compared
//! as calendar days, independent of the time of day.
//!
//! | Condition      | Status    | Message                    |
//! |----------------|-----------|----------------------------|
//! | used           | `used`    | 사용완료                    |
//! | days < 0       | `expired` | 만료됨                      |
//! | days <= 1      | `today`   | 오늘 만료 / 내일 만료        |
//! | days <= 7      | `soon`    | {days}일 후 만료            |
//! | otherwise      | `normal`  | (no badge)                 |
//!
//! `days <= 1` is the single "today" rule for the whole crate; the
//! notification builder uses [`TODAY_THRESHOLD_DAYS`] as well.

use chrono::NaiveDate;
use gifticon_core::{ExpiryStatus, Voucher};
use serde::Serialize;

/// Vouchers with at most this many days left are flagged as expiring today.
pub const TODAY_THRESHOLD_DAYS: i64 = 1;

/// Vouchers with at most this many days left are flagged as expiring soon.
pub const SOON_THRESHOLD_DAYS: i64 = 7;

/// Badge shown on a voucher card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiryBadge {
    pub status: ExpiryStatus,
    /// Badge text; `None` for vouchers that need no badge.
    pub message: Option<String>,
}

/// Whole days from `today` until `expiry` (negative once expired).
#[must_use]
pub fn days_until(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

/// Classify an expiry date and used flag against `today`.
#[must_use]
pub fn classify(expiry: NaiveDate, is_used: bool, today: NaiveDate) -> ExpiryBadge {
    if is_used {
        return ExpiryBadge {
            status: ExpiryStatus::Used,
            message: Some("사용완료".to_string()),
        };
    }

    let days = days_until(expiry, today);
    let (status, message) = if days < 0 {
        (ExpiryStatus::Expired, Some("만료됨".to_string()))
    } else if days <= TODAY_THRESHOLD_DAYS {
        let text = if days == 0 { "오늘 만료" } else { "내일 만료" };
        (ExpiryStatus::Today, Some(text.to_string()))
    } else if days <= SOON_THRESHOLD_DAYS {
        (ExpiryStatus::Soon, Some(format!("{days}일 후 만료")))
    } else {
        (ExpiryStatus::Normal, None)
    };

    ExpiryBadge { status, message }
}

/// Classify a voucher against `today`.
#[must_use]
pub fn classify_voucher(voucher: &Voucher, today: NaiveDate) -> ExpiryBadge {
    classify(voucher.expiry_date, voucher.is_used, today)
}

/// Whether the voucher's expiry date has passed. Used vouchers are never expired.
#[must_use]
pub fn is_expired(voucher: &Voucher, today: NaiveDate) -> bool {
    !voucher.is_used && voucher.expiry_date < today
}

/// Whether the voucher can still be redeemed (not used, not expired).
#[must_use]
pub fn is_redeemable(voucher: &Voucher, today: NaiveDate) -> bool {
    !voucher.is_used && voucher.expiry_date >= today
}
