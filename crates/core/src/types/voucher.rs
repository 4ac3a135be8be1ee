//! Voucher records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::amount::Won;
use super::id::VoucherId;

const fn default_notify_nearby() -> bool {
    true
}

/// A registered gift voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    pub id: VoucherId,
    /// Product name shown on the card (e.g. "아메리카노").
    pub name: String,
    /// Issuing store (e.g. "스타벅스").
    pub store: String,
    pub amount: Won,
    /// Last day the voucher can be redeemed. Calendar date, no time of day.
    pub expiry_date: NaiveDate,
    /// Reference to the scanned or uploaded image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
    /// Who sent the voucher, when it was received as a gift.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gifter: Option<String>,
    /// Whether to notify when near one of the voucher's stores.
    #[serde(default = "default_notify_nearby")]
    pub notify_nearby: bool,
}

impl Voucher {
    /// Build a voucher from registration input.
    #[must_use]
    pub fn from_new(id: VoucherId, created_at: DateTime<Utc>, input: NewVoucher) -> Self {
        Self {
            id,
            name: input.name,
            store: input.store,
            amount: input.amount,
            expiry_date: input.expiry_date,
            image: input.image,
            barcode: input.barcode,
            qr_code: input.qr_code,
            is_used: input.is_used,
            created_at,
            gifter: input.gifter,
            notify_nearby: input.notify_nearby.unwrap_or(true),
        }
    }

    /// Whether the voucher carries any redemption code.
    #[must_use]
    pub const fn has_redemption_code(&self) -> bool {
        self.qr_code.is_some() || self.barcode.is_some()
    }
}

/// Registration input: a voucher without id and creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVoucher {
    pub name: String,
    pub store: String,
    pub amount: Won,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub is_used: bool,
    #[serde(default)]
    pub gifter: Option<String>,
    /// Defaults to enabled when absent.
    #[serde(default)]
    pub notify_nearby: Option<bool>,
}

impl NewVoucher {
    /// Minimal registration input with the required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        store: impl Into<String>,
        amount: Won,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            store: store.into(),
            amount,
            expiry_date,
            image: None,
            barcode: None,
            qr_code: None,
            is_used: false,
            gifter: None,
            notify_nearby: None,
        }
    }
}
