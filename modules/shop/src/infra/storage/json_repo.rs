//! JSON-file backed implementations of the domain repository ports.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::contract::model::{Package, Receipt, TransferLogEntry, User};
use crate::domain::repo::{PackagesRepository, PurchaseLog, TransferLog, UsersRepository};
use crate::domain::service::Repositories;
use crate::infra::storage::entity::{PackageRecord, ReceiptRecord, TransferRecord, UsersDocument};
use crate::infra::storage::json_file::JsonFile;
use crate::infra::storage::mapper;

pub struct JsonUsersRepository {
    file: JsonFile<UsersDocument>,
}

impl JsonUsersRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: JsonFile::new(path.as_ref()),
        }
    }
}

#[async_trait]
impl UsersRepository for JsonUsersRepository {
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
        let doc = self.file.load().await?;
        doc.users()
            .iter()
            .find(|r| r.id == id)
            .map(mapper::user_from_record)
            .transpose()
    }

    async fn save(&self, u: &User) -> anyhow::Result<()> {
        self.save_all(std::slice::from_ref(u)).await
    }

    async fn save_all(&self, users: &[User]) -> anyhow::Result<()> {
        self.file
            .update(|doc| {
                let records = doc.users_mut();
                for u in users {
                    let rec = records
                        .iter_mut()
                        .find(|r| r.id == u.id)
                        .ok_or_else(|| anyhow!("user {} no longer exists", u.id))?;
                    mapper::apply_user(rec, u);
                }
                Ok(())
            })
            .await
            .context("save users")
    }
}

pub struct JsonPackagesRepository {
    file: JsonFile<Vec<PackageRecord>>,
}

impl JsonPackagesRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: JsonFile::new(path.as_ref()),
        }
    }
}

#[async_trait]
impl PackagesRepository for JsonPackagesRepository {
    async fn list(&self) -> anyhow::Result<Vec<Package>> {
        let records = self.file.load().await?;
        Ok(records.iter().map(mapper::package_from_record).collect())
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Package>> {
        let records = self.file.load().await?;
        Ok(records
            .iter()
            .find(|r| r.id == id)
            .map(mapper::package_from_record))
    }

    async fn save(&self, p: &Package) -> anyhow::Result<()> {
        self.file
            .update(|records| {
                let rec = records
                    .iter_mut()
                    .find(|r| r.id == p.id)
                    .ok_or_else(|| anyhow!("package {} no longer exists", p.id))?;
                mapper::apply_package(rec, p);
                Ok(())
            })
            .await
            .context("save package")
    }
}

/// Log entries are kept as raw JSON so appending never rewrites older
/// entries in a different shape.
pub struct JsonPurchaseLog {
    file: JsonFile<Vec<Value>>,
}

impl JsonPurchaseLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: JsonFile::new(path.as_ref()),
        }
    }
}

#[async_trait]
impl PurchaseLog for JsonPurchaseLog {
    async fn append(&self, receipt: &Receipt) -> anyhow::Result<()> {
        let value = serde_json::to_value(mapper::receipt_to_record(receipt))?;
        self.file
            .update(|entries| {
                entries.push(value);
                Ok(())
            })
            .await
            .context("append receipt")
    }

    async fn list_for_user(&self, user_id: &str) -> anyhow::Result<Vec<Receipt>> {
        let entries = self.file.load().await?;
        Ok(entries
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<ReceiptRecord>(v) {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!(path = %self.file.path().display(), "Skipping unreadable receipt: {e}");
                    None
                }
            })
            .filter(|r| r.user_id == user_id)
            .map(mapper::receipt_from_record)
            .collect())
    }
}

pub struct JsonTransferLog {
    file: JsonFile<Vec<Value>>,
}

impl JsonTransferLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: JsonFile::new(path.as_ref()),
        }
    }
}

#[async_trait]
impl TransferLog for JsonTransferLog {
    async fn append(&self, entry: &TransferLogEntry) -> anyhow::Result<()> {
        let value = serde_json::to_value(mapper::transfer_to_record(entry))?;
        self.file
            .update(|entries| {
                entries.push(value);
                Ok(())
            })
            .await
            .context("append transfer")
    }

    async fn list(&self) -> anyhow::Result<Vec<TransferLogEntry>> {
        let entries = self.file.load().await?;
        Ok(entries
            .into_iter()
            .filter_map(|v| {
                serde_json::from_value::<TransferRecord>(v)
                    .map_err(anyhow::Error::from)
                    .and_then(mapper::transfer_from_record)
                    .map_err(|e| {
                        warn!(
                            path = %self.file.path().display(),
                            "Skipping unreadable transfer: {e:#}"
                        );
                    })
                    .ok()
            })
            .collect())
    }
}

/// The four stores of one data directory.
pub struct JsonStores {
    pub users: Arc<JsonUsersRepository>,
    pub packages: Arc<JsonPackagesRepository>,
    pub purchases: Arc<JsonPurchaseLog>,
    pub transfers: Arc<JsonTransferLog>,
}

impl JsonStores {
    pub fn open(
        dir: &Path,
        users_file: &str,
        packages_file: &str,
        purchases_file: &str,
        transfers_file: &str,
    ) -> Self {
        Self {
            users: Arc::new(JsonUsersRepository::new(dir.join(users_file))),
            packages: Arc::new(JsonPackagesRepository::new(dir.join(packages_file))),
            purchases: Arc::new(JsonPurchaseLog::new(dir.join(purchases_file))),
            transfers: Arc::new(JsonTransferLog::new(dir.join(transfers_file))),
        }
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: self.users.clone(),
            packages: self.packages.clone(),
            purchases: self.purchases.clone(),
            transfers: self.transfers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::Role;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn user_save_keeps_other_users_and_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            json!({"users": [
                {"id": "1", "name": "a", "coin": 10, "role": "member", "isBanned": false, "email": "a@x"},
                {"id": "2", "name": "b", "coin": 20, "role": "owner", "isBanned": true}
            ]})
            .to_string(),
        )
        .unwrap();
        let repo = JsonUsersRepository::new(&path);

        let mut u = repo.find_by_id("1").await.unwrap().unwrap();
        u.coin = 4;
        u.role = Role::Customer;
        repo.save(&u).await.unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["users"][0]["coin"], 4);
        assert_eq!(raw["users"][0]["role"], "customer");
        assert_eq!(raw["users"][0]["email"], "a@x");
        assert_eq!(raw["users"][1]["coin"], 20);
        assert_eq!(raw["users"][1]["isBanned"], true);
    }

    #[tokio::test]
    async fn saving_vanished_user_fails() {
        let dir = tempdir().unwrap();
        let repo = JsonUsersRepository::new(dir.path().join("users.json"));
        let ghost = User {
            id: "9".into(),
            name: String::new(),
            coin: 0,
            role: Role::Member,
            is_banned: false,
        };
        assert!(repo.save(&ghost).await.is_err());
        assert!(repo.find_by_id("9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn purchase_log_skips_legacy_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("userPurchases.json");
        std::fs::write(
            &path,
            json!([
                {"userId": "u1", "packageId": "p", "purchaseDate": "2024-01-01T00:00:00Z"},
                {"nonsense": true}
            ])
            .to_string(),
        )
        .unwrap();
        let log = JsonPurchaseLog::new(&path);
        let receipts = log.list_for_user("u1").await.unwrap();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].stock, "");
        assert_eq!(receipts[0].expire_date, receipts[0].purchase_date);
    }

    #[tokio::test]
    async fn transfer_log_skips_unreadable_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transferLogs.json");
        std::fs::write(
            &path,
            json!([
                {
                    "logId": "6f1c2a9e-3d4b-4c5a-9e7f-1a2b3c4d5e6f",
                    "fromUserId": "1",
                    "toUserId": 2,
                    "amount": 15,
                    "date": "2024-03-01T10:00:00Z"
                },
                {"logId": "not-a-uuid", "fromUserId": "1", "toUserId": "2", "amount": 1},
                "garbage"
            ])
            .to_string(),
        )
        .unwrap();
        let log = JsonTransferLog::new(&path);

        let entries = log.list().await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].to_user_id, "2");
        assert_eq!(entries[0].amount, 15);
    }
}
