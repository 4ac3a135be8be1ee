//! Stand-in recognition used when no OCR provider is available.
//!
//! Produces plausible but made-up values from fixed candidate lists so the
//! registration flow can be exercised end to end without a provider. The
//! output says nothing about the actual image.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Months;
use gifticon_core::{ExtractedInfo, Won};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::clock::SharedClock;

use super::validate::image_dimensions;
use super::{ImageInput, RecognitionError, RecognitionProvider};

pub const PLACEHOLDER_STORES: [&str; 5] = ["스타벅스", "맥도날드", "GS25", "CU", "세븐일레븐"];
pub const PLACEHOLDER_AMOUNTS: [i64; 4] = [5000, 10000, 15000, 20000];
pub const PLACEHOLDER_NAMES: [&str; 4] = ["아메리카노", "카페라떼", "치킨버거 세트", "편의점 상품권"];

/// Expiry is between one and this many months from today.
pub const PLACEHOLDER_MAX_MONTHS: u32 = 6;

/// Placeholder provider with an injectable random source.
pub struct PlaceholderProvider {
    rng: Mutex<StdRng>,
    clock: SharedClock,
}

impl PlaceholderProvider {
    /// Seeded from the operating system.
    #[must_use]
    pub fn new(clock: SharedClock) -> Self {
        Self::with_rng(StdRng::from_os_rng(), clock)
    }

    /// Deterministic output for a given seed.
    #[must_use]
    pub fn seeded(seed: u64, clock: SharedClock) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), clock)
    }

    #[must_use]
    pub const fn with_rng(rng: StdRng, clock: SharedClock) -> Self {
        Self {
            rng: Mutex::new(rng),
            clock,
        }
    }

    /// Draw one set of placeholder fields.
    #[must_use]
    pub fn generate(&self) -> ExtractedInfo {
        let today = self.clock.today();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let store = PLACEHOLDER_STORES.choose(&mut *rng).map(ToString::to_string);
        let amount = PLACEHOLDER_AMOUNTS
            .choose(&mut *rng)
            .and_then(|amount| Won::new(*amount).ok());
        let months = rng.random_range(1..=PLACEHOLDER_MAX_MONTHS);
        let expiry_date = today.checked_add_months(Months::new(months));
        let name = PLACEHOLDER_NAMES.choose(&mut *rng).map(ToString::to_string);
        drop(rng);

        ExtractedInfo {
            store,
            name,
            amount,
            expiry_date,
        }
    }
}

#[async_trait]
impl RecognitionProvider for PlaceholderProvider {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn extract(&self, image: &ImageInput) -> Result<ExtractedInfo, RecognitionError> {
        // Mirrors a failed image load: nothing recognised.
        if image_dimensions(&image.bytes).is_none() {
            tracing::debug!(
                file_name = ?image.file_name,
                "Placeholder recognition skipped undecodable image"
            );
            return Ok(ExtractedInfo::default());
        }
        Ok(self.generate())
    }
}
