use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{Receipt, User};

/// What an outside system is told about a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseNotice {
    pub user_id: String,
    pub user_name: String,
    pub package_id: String,
    pub package_name: String,
    pub duration_label: String,
    pub coin_price: u64,
    pub purchase_date: DateTime<Utc>,
}

impl PurchaseNotice {
    pub fn new(buyer: &User, receipt: &Receipt) -> Self {
        Self {
            user_id: receipt.user_id.clone(),
            user_name: buyer.name.clone(),
            package_id: receipt.package_id.clone(),
            package_name: receipt.package_name.clone(),
            duration_label: receipt.duration_label.clone(),
            coin_price: receipt.coin_price,
            purchase_date: receipt.purchase_date,
        }
    }
}

/// Transport-agnostic output port for purchase notifications.
/// Failures never affect the purchase that triggered them.
#[async_trait]
pub trait PurchaseNotifier: Send + Sync {
    async fn purchase_completed(&self, notice: &PurchaseNotice) -> anyhow::Result<()>;
}

/// Notifier used when no notification endpoint is configured.
pub struct NoopNotifier;

#[async_trait]
impl PurchaseNotifier for NoopNotifier {
    async fn purchase_completed(&self, _notice: &PurchaseNotice) -> anyhow::Result<()> {
        Ok(())
    }
}
