use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::ShopApi,
    error::ShopError,
    model::{
        BalanceChange, Package, PurchaseRequest, Receipt, TransferLogEntry, TransferOutcome, User,
    },
};
use crate::domain::service::Service;

/// Local implementation of the ShopApi trait that delegates to the domain service
pub struct ShopLocalClient {
    service: Arc<Service>,
}

impl ShopLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ShopApi for ShopLocalClient {
    async fn purchase(&self, request: PurchaseRequest) -> Result<Receipt, ShopError> {
        self.service.fulfill(request).await.map_err(Into::into)
    }

    async fn get_user(&self, id: &str) -> Result<User, ShopError> {
        self.service.get_user(id).await.map_err(Into::into)
    }

    async fn list_packages(&self) -> Result<Vec<Package>, ShopError> {
        self.service.list_packages().await.map_err(Into::into)
    }

    async fn get_package(&self, id: &str) -> Result<Package, ShopError> {
        self.service.get_package(id).await.map_err(Into::into)
    }

    async fn list_user_purchases(&self, user_id: &str) -> Result<Vec<Receipt>, ShopError> {
        self.service
            .list_user_purchases(user_id)
            .await
            .map_err(Into::into)
    }

    async fn transfer(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        amount: i64,
    ) -> Result<TransferOutcome, ShopError> {
        self.service
            .transfer(from_user_id, to_user_id, amount)
            .await
            .map_err(Into::into)
    }

    async fn list_transfers(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<TransferLogEntry>, ShopError> {
        self.service.list_transfers(user_id).await.map_err(Into::into)
    }

    async fn adjust_balance(&self, user_id: &str, amount: i64) -> Result<BalanceChange, ShopError> {
        self.service
            .adjust_balance(user_id, amount)
            .await
            .map_err(Into::into)
    }

    async fn replace_stock(
        &self,
        package_id: &str,
        duration_label: &str,
        stock_list: Vec<String>,
    ) -> Result<Package, ShopError> {
        self.service
            .replace_stock(package_id, duration_label, stock_list)
            .await
            .map_err(Into::into)
    }
}
