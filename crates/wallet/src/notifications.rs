//! Expiry reminder notices.

use chrono::NaiveDate;
use gifticon_core::{ExpiryStatus, Voucher, VoucherId};
use serde::Serialize;

use crate::expiry::{classify, days_until};

/// A reminder for a voucher that expires within the notification window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryNotice {
    pub voucher_id: VoucherId,
    pub days_left: i64,
    pub status: ExpiryStatus,
    pub message: String,
}

/// Reminder sentence for a voucher with `days_left` days remaining.
#[must_use]
pub fn notice_message(voucher: &Voucher, days_left: i64) -> String {
    let tail = match days_left {
        0 => "오늘 만료됩니다!".to_string(),
        1 => "내일 만료됩니다!".to_string(),
        n => format!("{n}일 후에 만료됩니다!"),
    };
    format!("{}의 {}(이)가 {tail}", voucher.store, voucher.name)
}

/// Build notices for every unused, unexpired voucher expiring within `window_days`.
///
/// Output follows the order of `vouchers`.
#[must_use]
pub fn build_notices(vouchers: &[Voucher], today: NaiveDate, window_days: i64) -> Vec<ExpiryNotice> {
    vouchers
        .iter()
        .filter(|voucher| !voucher.is_used)
        .filter_map(|voucher| {
            let days_left = days_until(voucher.expiry_date, today);
            if !(0..=window_days).contains(&days_left) {
                return None;
            }
            Some(ExpiryNotice {
                voucher_id: voucher.id,
                days_left,
                status: classify(voucher.expiry_date, false, today).status,
                message: notice_message(voucher, days_left),
            })
        })
        .collect()
}
