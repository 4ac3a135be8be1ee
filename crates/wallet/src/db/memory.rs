//! In-memory voucher repository.

use async_trait::async_trait;
use gifticon_core::{Voucher, VoucherId};
use tokio::sync::RwLock;

use super::{RepositoryError, VoucherRepository, insert_into, update_in};

/// Vouchers held in a vector for the life of the process.
#[derive(Default)]
pub struct MemoryVoucherRepository {
    vouchers: RwLock<Vec<Voucher>>,
}

impl MemoryVoucherRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoucherRepository for MemoryVoucherRepository {
    async fn list(&self) -> Result<Vec<Voucher>, RepositoryError> {
        Ok(self.vouchers.read().await.clone())
    }

    async fn get(&self, id: VoucherId) -> Result<Option<Voucher>, RepositoryError> {
        Ok(self.vouchers.read().await.iter().find(|v| v.id == id).cloned())
    }

    async fn insert(&self, voucher: Voucher) -> Result<(), RepositoryError> {
        insert_into(&mut *self.vouchers.write().await, voucher)
    }

    async fn update(&self, voucher: Voucher) -> Result<(), RepositoryError> {
        update_in(&mut self.vouchers.write().await, voucher)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use gifticon_core::{NewVoucher, Won};

    use super::*;

    fn voucher(id: i64) -> Voucher {
        Voucher::from_new(
            VoucherId::new(id),
            Utc::now(),
            NewVoucher::new(
                "아메리카노",
                "스타벅스",
                Won::new(4500).expect("won"),
                NaiveDate::from_ymd_opt(2025, 7, 5).expect("date"),
            ),
        )
    }

    #[tokio::test]
    async fn test_insert_list_get() {
        let repo = MemoryVoucherRepository::new();
        repo.insert(voucher(2)).await.expect("insert");
        repo.insert(voucher(1)).await.expect("insert");

        let ids: Vec<_> = repo.list().await.expect("list").iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![VoucherId::new(2), VoucherId::new(1)]);
        assert!(repo.get(VoucherId::new(1)).await.expect("get").is_some());
        assert!(repo.get(VoucherId::new(3)).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let repo = MemoryVoucherRepository::new();
        repo.insert(voucher(1)).await.expect("insert");
        assert!(matches!(
            repo.insert(voucher(1)).await,
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let repo = MemoryVoucherRepository::new();
        repo.insert(voucher(1)).await.expect("insert");

        let mut used = voucher(1);
        used.is_used = true;
        repo.update(used).await.expect("update");
        assert!(repo.get(VoucherId::new(1)).await.expect("get").expect("exists").is_used);

        assert!(matches!(
            repo.update(voucher(9)).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
