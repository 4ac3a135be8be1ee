//! Voucher manager.
//!
//! Owns the voucher collection through a [`VoucherRepository`] and keeps the
//! derived state the screens need:
//! 1. Active / used / expired partitions, computed against the clock
//! 2. Expiry reminders, recomputed after every mutation and once the date
//!    moves past the day they were computed for
//! 3. The voucher currently open in the detail view
//!
//! Mutations run one at a time behind a single lock.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use gifticon_core::{
    NewVoucher, StoreCategory, Voucher, VoucherId, Won, category_for_store, category_icon,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::clock::SharedClock;
use crate::db::{RepositoryError, VoucherRepository};
use crate::expiry::{ExpiryBadge, classify_voucher, days_until, is_expired, is_redeemable};
use crate::notifications::{ExpiryNotice, build_notices};

/// Vouchers split for the list tabs. Every voucher is in exactly one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partitions {
    /// Not used and expiry date today or later.
    pub active: Vec<Voucher>,
    /// Marked used, whatever the date.
    pub used: Vec<Voucher>,
    /// Not used and expiry date in the past.
    pub expired: Vec<Voucher>,
}

impl Partitions {
    /// Split `vouchers` against `today`, keeping their order.
    #[must_use]
    pub fn split(vouchers: Vec<Voucher>, today: NaiveDate) -> Self {
        let mut partitions = Self::default();
        for voucher in vouchers {
            if voucher.is_used {
                partitions.used.push(voucher);
            } else if is_expired(&voucher, today) {
                partitions.expired.push(voucher);
            } else {
                partitions.active.push(voucher);
            }
        }
        partitions
    }
}

/// Everything the detail screen shows for one voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherDetail {
    pub voucher: Voucher,
    pub badge: ExpiryBadge,
    pub days_until: i64,
    /// Whether "mark used" is offered (not used and not expired).
    pub redeemable: bool,
    pub category: Option<&'static StoreCategory>,
    pub icon: &'static str,
}

#[derive(Default)]
struct ManagerState {
    selected: Option<VoucherId>,
    notices: Vec<ExpiryNotice>,
    /// Date `notices` were computed against.
    computed_for: Option<NaiveDate>,
}

/// Voucher collection service.
pub struct VoucherManager {
    repo: Arc<dyn VoucherRepository>,
    clock: SharedClock,
    notify_window_days: i64,
    state: RwLock<ManagerState>,
}

impl VoucherManager {
    /// Create a manager. Call [`Self::refresh`] once to compute reminders.
    #[must_use]
    pub fn new(repo: Arc<dyn VoucherRepository>, clock: SharedClock, notify_window_days: i64) -> Self {
        Self {
            repo,
            clock,
            notify_window_days,
            state: RwLock::new(ManagerState::default()),
        }
    }

    /// The manager's notion of today.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// All vouchers in registration order.
    ///
    /// # Errors
    ///
    /// Returns error if the repository cannot be read.
    pub async fn list(&self) -> Result<Vec<Voucher>, RepositoryError> {
        self.repo.list().await
    }

    /// Look up one voucher.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    pub async fn get(&self, id: VoucherId) -> Result<Voucher, RepositoryError> {
        self.repo.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Register a voucher.
    ///
    /// The id is the creation time in milliseconds, bumped past the largest
    /// existing id so ids stay strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns error if the repository write fails.
    #[instrument(skip(self, input), fields(store = %input.store))]
    pub async fn add(&self, input: NewVoucher) -> Result<Voucher, RepositoryError> {
        let mut state = self.state.write().await;

        let mut vouchers = self.repo.list().await?;
        let now = self.clock.now();
        let next_free = vouchers
            .iter()
            .map(|v| v.id.as_i64().saturating_add(1))
            .max()
            .unwrap_or(0);
        let id = VoucherId::new(now.timestamp_millis().max(next_free));

        let voucher = Voucher::from_new(id, now, input);
        self.repo.insert(voucher.clone()).await?;
        info!(voucher_id = %voucher.id, name = %voucher.name, "Registered voucher");

        vouchers.push(voucher.clone());
        self.recompute(&mut state, &vouchers);
        Ok(voucher)
    }

    /// Mark a voucher used and close the detail view. Marking twice is harmless.
    ///
    /// Expired vouchers are not refused here; callers gate the action on
    /// [`VoucherDetail::redeemable`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(voucher_id = %id))]
    pub async fn mark_used(&self, id: VoucherId) -> Result<Voucher, RepositoryError> {
        let mut state = self.state.write().await;

        let mut voucher = self.get(id).await?;
        if !voucher.is_used {
            voucher.is_used = true;
            self.repo.update(voucher.clone()).await?;
            info!("Voucher marked used");
        }
        state.selected = None;

        let vouchers = self.repo.list().await?;
        self.recompute(&mut state, &vouchers);
        Ok(voucher)
    }

    /// Flip the nearby-store notification preference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(voucher_id = %id))]
    pub async fn toggle_notification(&self, id: VoucherId) -> Result<Voucher, RepositoryError> {
        let mut state = self.state.write().await;

        let mut voucher = self.get(id).await?;
        voucher.notify_nearby = !voucher.notify_nearby;
        self.repo.update(voucher.clone()).await?;
        info!(notify_nearby = voucher.notify_nearby, "Toggled nearby notification");

        let vouchers = self.repo.list().await?;
        self.recompute(&mut state, &vouchers);
        Ok(voucher)
    }

    /// Open a voucher in the detail view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    pub async fn select(&self, id: VoucherId) -> Result<Voucher, RepositoryError> {
        let mut state = self.state.write().await;
        let voucher = self.get(id).await?;
        state.selected = Some(id);
        Ok(voucher)
    }

    /// Close the detail view.
    pub async fn clear_selection(&self) {
        self.state.write().await.selected = None;
    }

    /// The voucher open in the detail view, as currently stored.
    ///
    /// # Errors
    ///
    /// Returns error if the repository cannot be read.
    pub async fn selected(&self) -> Result<Option<Voucher>, RepositoryError> {
        let selected = self.state.read().await.selected;
        match selected {
            Some(id) => self.repo.get(id).await,
            None => Ok(None),
        }
    }

    /// Split the collection into active, used and expired vouchers.
    ///
    /// # Errors
    ///
    /// Returns error if the repository cannot be read.
    pub async fn partitions(&self) -> Result<Partitions, RepositoryError> {
        Ok(Partitions::split(self.repo.list().await?, self.today()))
    }

    /// Reminder sentences for today.
    ///
    /// # Errors
    ///
    /// Returns error if the reminders are stale and the repository cannot be read.
    pub async fn notifications(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .notices()
            .await?
            .into_iter()
            .map(|notice| notice.message)
            .collect())
    }

    /// Structured reminders for today.
    ///
    /// Served from the last recomputation while the date is unchanged;
    /// recomputed first once the clock has moved to another day.
    ///
    /// # Errors
    ///
    /// Returns error if the reminders are stale and the repository cannot be read.
    pub async fn notices(&self) -> Result<Vec<ExpiryNotice>, RepositoryError> {
        let today = self.today();
        {
            let state = self.state.read().await;
            if state.computed_for == Some(today) {
                return Ok(state.notices.clone());
            }
        }

        let mut state = self.state.write().await;
        if state.computed_for != Some(today) {
            let vouchers = self.repo.list().await?;
            self.recompute(&mut state, &vouchers);
        }
        Ok(state.notices.clone())
    }

    /// Recompute reminders against today's date.
    ///
    /// # Errors
    ///
    /// Returns error if the repository cannot be read.
    pub async fn refresh(&self) -> Result<Vec<String>, RepositoryError> {
        let mut state = self.state.write().await;
        let vouchers = self.repo.list().await?;
        self.recompute(&mut state, &vouchers);
        Ok(state.notices.iter().map(|n| n.message.clone()).collect())
    }

    /// Expiry badge, redeemability and category for one voucher.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    pub async fn detail(&self, id: VoucherId) -> Result<VoucherDetail, RepositoryError> {
        let voucher = self.get(id).await?;
        let today = self.today();
        Ok(VoucherDetail {
            badge: classify_voucher(&voucher, today),
            days_until: days_until(voucher.expiry_date, today),
            redeemable: is_redeemable(&voucher, today),
            category: category_for_store(&voucher.store),
            icon: category_icon(&voucher.store),
            voucher,
        })
    }

    /// Insert the sample vouchers into an empty wallet.
    ///
    /// Returns how many were inserted (zero if the wallet already had vouchers).
    ///
    /// # Errors
    ///
    /// Returns error if the repository cannot be read or written.
    #[instrument(skip(self))]
    pub async fn seed_samples(&self) -> Result<usize, RepositoryError> {
        let mut state = self.state.write().await;

        if !self.repo.list().await?.is_empty() {
            return Ok(0);
        }

        let samples = sample_vouchers()?;
        let count = samples.len();
        for voucher in samples {
            self.repo.insert(voucher).await?;
        }
        info!(count, "Seeded sample vouchers");

        let vouchers = self.repo.list().await?;
        self.recompute(&mut state, &vouchers);
        Ok(count)
    }

    fn recompute(&self, state: &mut ManagerState, vouchers: &[Voucher]) {
        let today = self.today();
        state.notices = build_notices(vouchers, today, self.notify_window_days);
        state.computed_for = Some(today);
    }
}

/// The three demo vouchers shown on first launch.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if a sample fails to build,
/// which only happens if the constants below are edited into nonsense.
pub fn sample_vouchers() -> Result<Vec<Voucher>, RepositoryError> {
    struct Sample {
        id: i64,
        name: &'static str,
        store: &'static str,
        amount: i64,
        expiry: (i32, u32, u32),
        created: (i32, u32, u32),
        barcode: Option<&'static str>,
        qr_code: Option<&'static str>,
        is_used: bool,
    }

    const SAMPLES: [Sample; 3] = [
        Sample {
            id: 1,
            name: "아메리카노",
            store: "스타벅스",
            amount: 4500,
            expiry: (2025, 7, 5),
            created: (2025, 6, 1),
            barcode: None,
            qr_code: Some("STARBUCKS123456789"),
            is_used: false,
        },
        Sample {
            id: 2,
            name: "치킨버거 세트",
            store: "맥도날드",
            amount: 8900,
            expiry: (2025, 7, 3),
            created: (2025, 6, 15),
            barcode: Some("1234567890123"),
            qr_code: None,
            is_used: false,
        },
        Sample {
            id: 3,
            name: "편의점 상품권",
            store: "GS25",
            amount: 10000,
            expiry: (2025, 8, 15),
            created: (2025, 5, 20),
            barcode: None,
            qr_code: Some("GS25GIFT987654321"),
            is_used: true,
        },
    ];

    let invalid = |what: &str| RepositoryError::DataCorruption(format!("invalid sample {what}"));

    SAMPLES
        .iter()
        .map(|s| {
            let amount = Won::new(s.amount).map_err(|_| invalid("amount"))?;
            let expiry = NaiveDate::from_ymd_opt(s.expiry.0, s.expiry.1, s.expiry.2)
                .ok_or_else(|| invalid("expiry"))?;
            let created = Utc
                .with_ymd_and_hms(s.created.0, s.created.1, s.created.2, 0, 0, 0)
                .single()
                .ok_or_else(|| invalid("creation date"))?;

            let mut input = NewVoucher::new(s.name, s.store, amount, expiry);
            input.barcode = s.barcode.map(ToString::to_string);
            input.qr_code = s.qr_code.map(ToString::to_string);
            input.is_used = s.is_used;
            Ok(Voucher::from_new(VoucherId::new(s.id), created, input))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{DateTime, Days};
    use gifticon_core::ExpiryStatus;

    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::db::MemoryVoucherRepository;

    /// Clock whose date a test can move forward.
    struct MovableClock {
        today: Mutex<NaiveDate>,
    }

    impl MovableClock {
        fn on(today: NaiveDate) -> Self {
            Self {
                today: Mutex::new(today),
            }
        }

        fn set(&self, today: NaiveDate) {
            *self.today.lock().expect("clock lock") = today;
        }
    }

    impl Clock for MovableClock {
        fn today(&self) -> NaiveDate {
            *self.today.lock().expect("clock lock")
        }

        fn now(&self) -> DateTime<Utc> {
            FixedClock::on(self.today()).now()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).expect("date")
    }

    fn manager() -> VoucherManager {
        VoucherManager::new(
            Arc::new(MemoryVoucherRepository::new()),
            Arc::new(FixedClock::on(today())),
            7,
        )
    }

    fn input(name: &str, days: u64) -> NewVoucher {
        NewVoucher::new(
            name,
            "스타벅스",
            Won::new(4500).expect("won"),
            today().checked_add_days(Days::new(days)).expect("date"),
        )
    }

    #[tokio::test]
    async fn test_add_assigns_increasing_ids_and_defaults() {
        let manager = manager();
        let first = manager.add(input("아메리카노", 3)).await.expect("add");
        let second = manager.add(input("카페라떼", 30)).await.expect("add");

        assert!(second.id > first.id);
        assert!(first.notify_nearby);
        assert!(!first.is_used);
        assert_eq!(first.created_at, FixedClock::on(today()).now());
    }

    #[tokio::test]
    async fn test_add_recomputes_notifications() {
        let manager = manager();
        assert!(manager.notifications().await.expect("notifications").is_empty());

        manager.add(input("아메리카노", 3)).await.expect("add");
        manager.add(input("카페라떼", 30)).await.expect("add");

        assert_eq!(
            manager.notifications().await.expect("notifications"),
            vec!["스타벅스의 아메리카노(이)가 3일 후에 만료됩니다!"]
        );
    }

    #[tokio::test]
    async fn test_mark_used_moves_voucher_to_used() {
        let manager = manager();
        let voucher = manager.add(input("아메리카노", 3)).await.expect("add");
        assert_eq!(manager.partitions().await.expect("partitions").active.len(), 1);

        manager.select(voucher.id).await.expect("select");
        let used = manager.mark_used(voucher.id).await.expect("mark used");
        assert!(used.is_used);

        let partitions = manager.partitions().await.expect("partitions");
        assert!(partitions.active.is_empty());
        assert!(partitions.expired.is_empty());
        assert_eq!(partitions.used.len(), 1);
        assert!(manager.selected().await.expect("selected").is_none());
        assert!(manager.notifications().await.expect("notifications").is_empty());

        // Idempotent.
        assert!(manager.mark_used(voucher.id).await.expect("again").is_used);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let manager = manager();
        let missing = VoucherId::new(404);
        assert!(matches!(manager.mark_used(missing).await, Err(RepositoryError::NotFound)));
        assert!(matches!(
            manager.toggle_notification(missing).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(manager.detail(missing).await, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_toggle_keeps_selection_in_sync() {
        let manager = manager();
        let voucher = manager.add(input("아메리카노", 10)).await.expect("add");
        manager.select(voucher.id).await.expect("select");

        let toggled = manager.toggle_notification(voucher.id).await.expect("toggle");
        assert!(!toggled.notify_nearby);
        let selected = manager.selected().await.expect("selected").expect("some");
        assert!(!selected.notify_nearby);

        let toggled = manager.toggle_notification(voucher.id).await.expect("toggle");
        assert!(toggled.notify_nearby);

        manager.clear_selection().await;
        assert!(manager.selected().await.expect("selected").is_none());
    }

    #[test]
    fn test_partitions_are_exclusive() {
        let vouchers = sample_vouchers().expect("samples");
        let partitions = Partitions::split(vouchers, today());
        assert_eq!(partitions.active.len(), 2);
        assert_eq!(partitions.used.len(), 1);
        assert!(partitions.expired.is_empty());

        let later = NaiveDate::from_ymd_opt(2025, 7, 4).expect("date");
        let vouchers = sample_vouchers().expect("samples");
        let partitions = Partitions::split(vouchers, later);
        assert_eq!(partitions.active.len(), 1);
        assert_eq!(partitions.expired.len(), 1);
        assert_eq!(partitions.used.len(), 1);
        assert_eq!(partitions.expired[0].store, "맥도날드");
    }

    #[tokio::test]
    async fn test_seed_samples_only_into_empty_wallet() {
        let manager = manager();
        assert_eq!(manager.seed_samples().await.expect("seed"), 3);
        assert_eq!(manager.seed_samples().await.expect("seed"), 0);

        // 2025-07-01: Starbucks in 4 days, McDonald's in 2 days, GS25 already used.
        assert_eq!(
            manager.notifications().await.expect("notifications"),
            vec![
                "스타벅스의 아메리카노(이)가 4일 후에 만료됩니다!",
                "맥도날드의 치킨버거 세트(이)가 2일 후에 만료됩니다!",
            ]
        );

        let next = manager.add(input("카페라떼", 5)).await.expect("add");
        assert!(next.id.as_i64() > 3);
    }

    #[tokio::test]
    async fn test_detail_reports_badge_and_redeemability() {
        let manager = manager();
        manager.seed_samples().await.expect("seed");

        let detail = manager.detail(VoucherId::new(2)).await.expect("detail");
        assert_eq!(detail.badge.status, ExpiryStatus::Soon);
        assert_eq!(detail.days_until, 2);
        assert!(detail.redeemable);
        assert_eq!(detail.category.map(|c| c.id), Some("fastfood"));
        assert_eq!(detail.icon, "🍔");

        let detail = manager.detail(VoucherId::new(3)).await.expect("detail");
        assert_eq!(detail.badge.status, ExpiryStatus::Used);
        assert!(!detail.redeemable);
    }

    #[tokio::test]
    async fn test_reminders_follow_the_clock_across_midnight() {
        let clock = Arc::new(MovableClock::on(today()));
        let manager = VoucherManager::new(
            Arc::new(MemoryVoucherRepository::new()),
            clock.clone(),
            7,
        );
        manager.add(input("아메리카노", 0)).await.expect("add");
        assert_eq!(
            manager.notifications().await.expect("notifications"),
            vec!["스타벅스의 아메리카노(이)가 오늘 만료됩니다!"]
        );

        clock.set(NaiveDate::from_ymd_opt(2025, 7, 3).expect("date"));

        let partitions = manager.partitions().await.expect("partitions");
        assert_eq!(partitions.expired.len(), 1);
        assert!(partitions.active.is_empty());
        assert!(manager.notifications().await.expect("notifications").is_empty());
        assert!(manager.notices().await.expect("notices").is_empty());
    }

    #[tokio::test]
    async fn test_reminders_count_down_without_mutations() {
        let clock = Arc::new(MovableClock::on(today()));
        let manager = VoucherManager::new(
            Arc::new(MemoryVoucherRepository::new()),
            clock.clone(),
            7,
        );
        let voucher = manager.add(input("아메리카노", 3)).await.expect("add");

        clock.set(today().checked_add_days(Days::new(2)).expect("date"));
        let notices = manager.notices().await.expect("notices");
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].voucher_id, voucher.id);
        assert_eq!(notices[0].days_left, 1);
        assert_eq!(notices[0].status, ExpiryStatus::Today);
    }

    #[tokio::test]
    async fn test_add_after_maximum_id_does_not_overflow() {
        let repo: Arc<dyn VoucherRepository> = Arc::new(MemoryVoucherRepository::new());
        let existing = Voucher::from_new(VoucherId::new(i64::MAX), Utc::now(), input("아메리카노", 3));
        repo.insert(existing).await.expect("insert");
        let manager = VoucherManager::new(repo, Arc::new(FixedClock::on(today())), 7);

        // No id is left above the maximum, so the insert collides.
        let added = manager.add(input("카페라떼", 5)).await;
        assert!(matches!(added, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_refresh_picks_up_date_change() {
        let repo: Arc<dyn VoucherRepository> = Arc::new(MemoryVoucherRepository::new());
        for voucher in sample_vouchers().expect("samples") {
            repo.insert(voucher).await.expect("insert");
        }

        let early = VoucherManager::new(
            repo.clone(),
            Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2025, 6, 1).expect("date"))),
            7,
        );
        assert!(early.refresh().await.expect("refresh").is_empty());

        let later = VoucherManager::new(
            repo,
            Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2025, 7, 3).expect("date"))),
            7,
        );
        let messages = later.refresh().await.expect("refresh");
        assert_eq!(messages.len(), 2);
        assert!(messages.contains(&"맥도날드의 치킨버거 세트(이)가 오늘 만료됩니다!".to_string()));
    }
}
