use async_trait::async_trait;

use crate::contract::model::{Package, Receipt, TransferLogEntry, User};

/// Persistence operations the domain needs for users.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>>;
    /// Overwrite an existing user (matched by `u.id`).
    async fn save(&self, u: &User) -> anyhow::Result<()>;
    /// Overwrite several users in a single write of the backing store.
    async fn save_all(&self, users: &[User]) -> anyhow::Result<()>;
}

#[async_trait]
pub trait PackagesRepository: Send + Sync {
    /// All packages in catalog order.
    async fn list(&self) -> anyhow::Result<Vec<Package>>;
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Package>>;
    /// Overwrite an existing package (matched by `p.id`).
    async fn save(&self, p: &Package) -> anyhow::Result<()>;
}

/// Append-only purchase history.
#[async_trait]
pub trait PurchaseLog: Send + Sync {
    async fn append(&self, receipt: &Receipt) -> anyhow::Result<()>;
    /// Receipts of one user in append order.
    async fn list_for_user(&self, user_id: &str) -> anyhow::Result<Vec<Receipt>>;
}

/// Append-only coin transfer history.
#[async_trait]
pub trait TransferLog: Send + Sync {
    async fn append(&self, entry: &TransferLogEntry) -> anyhow::Result<()>;
    async fn list(&self) -> anyhow::Result<Vec<TransferLogEntry>>;
}
