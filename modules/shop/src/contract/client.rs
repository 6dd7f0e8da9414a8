use async_trait::async_trait;

use crate::contract::{
    error::ShopError,
    model::{BalanceChange, Package, PurchaseRequest, Receipt, TransferLogEntry, TransferOutcome, User},
};

/// Public API trait for the shop module that other modules can use
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// Buy one stock token of a package duration.
    async fn purchase(&self, request: PurchaseRequest) -> Result<Receipt, ShopError>;

    async fn get_user(&self, id: &str) -> Result<User, ShopError>;

    async fn list_packages(&self) -> Result<Vec<Package>, ShopError>;

    async fn get_package(&self, id: &str) -> Result<Package, ShopError>;

    /// Receipts of one user, newest first.
    async fn list_user_purchases(&self, user_id: &str) -> Result<Vec<Receipt>, ShopError>;

    async fn transfer(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        amount: i64,
    ) -> Result<TransferOutcome, ShopError>;

    /// Transfer log, optionally narrowed to entries involving one user.
    async fn list_transfers(&self, user_id: Option<&str>)
        -> Result<Vec<TransferLogEntry>, ShopError>;

    async fn adjust_balance(&self, user_id: &str, amount: i64) -> Result<BalanceChange, ShopError>;

    async fn replace_stock(
        &self,
        package_id: &str,
        duration_label: &str,
        stock_list: Vec<String>,
    ) -> Result<Package, ShopError>;
}
