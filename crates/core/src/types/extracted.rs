//! Best-effort voucher fields read from an image.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::amount::Won;

/// Voucher fields recognised from a photo.
///
/// Every field is optional and none is authoritative: the values only prefill
/// the registration form until the user confirms them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Won>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}

impl ExtractedInfo {
    /// Whether nothing at all was recognised.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.store.is_none()
            && self.name.is_none()
            && self.amount.is_none()
            && self.expiry_date.is_none()
    }
}
