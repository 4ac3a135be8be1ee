//! Source of "today" and "now".
//!
//! Expiry logic compares calendar dates, so the clock hands out the local
//! calendar date rather than an instant. Tests pin the date with [`FixedClock`].

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Provides the current date and time.
pub trait Clock: Send + Sync {
    /// The user's current calendar date.
    fn today(&self) -> NaiveDate;

    /// The current instant, used for creation timestamps.
    fn now(&self) -> DateTime<Utc>;
}

/// Shared clock handle.
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock in the machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Pin the clock to midday UTC of `today`.
    #[must_use]
    pub fn on(today: NaiveDate) -> Self {
        let now = today
            .and_hms_opt(12, 0, 0)
            .map_or_else(Utc::now, |dt| dt.and_utc());
        Self { today, now }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
