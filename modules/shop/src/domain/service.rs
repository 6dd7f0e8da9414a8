use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    BalanceChange, Package, PurchaseRequest, Receipt, TransferLogEntry, TransferOutcome, User,
};
use crate::domain::error::DomainError;
use crate::domain::locks::{package_key, user_key, KeyedLocks};
use crate::domain::ports::{PurchaseNotice, PurchaseNotifier};
use crate::domain::repo::{PackagesRepository, PurchaseLog, TransferLog, UsersRepository};

/// The stores the service reads and writes.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UsersRepository>,
    pub packages: Arc<dyn PackagesRepository>,
    pub purchases: Arc<dyn PurchaseLog>,
    pub transfers: Arc<dyn TransferLog>,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Validity of a purchase whose duration carries no `days`.
    pub default_days: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { default_days: 1 }
    }
}

/// Domain service with the shop's business rules.
/// Depends only on the repository and notifier ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repos: Repositories,
    notifier: Arc<dyn PurchaseNotifier>,
    locks: KeyedLocks,
    config: ServiceConfig,
}

impl Service {
    pub fn new(
        repos: Repositories,
        notifier: Arc<dyn PurchaseNotifier>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repos,
            notifier,
            locks: KeyedLocks::new(),
            config,
        }
    }

    /// Buy one stock token: debit the user, consume the oldest token of the
    /// matching duration and record a receipt.
    ///
    /// Package, user and receipt are written in that order as separate
    /// writes. A failed write is reported with its stage and earlier writes
    /// are left in place. The notifier runs after the locks are released.
    #[instrument(
        name = "shop.service.fulfill",
        skip(self, req),
        fields(
            user_id = %req.user_id,
            package_id = %req.package_id,
            duration_label = %req.duration_label
        )
    )]
    pub async fn fulfill(&self, req: PurchaseRequest) -> Result<Receipt, DomainError> {
        info!("Fulfilling purchase");
        require_non_blank("userId", &req.user_id)?;
        require_non_blank("packageId", &req.package_id)?;
        require_non_blank("durationLabel", &req.duration_label)?;

        let guard = self
            .locks
            .lock_all([user_key(&req.user_id), package_key(&req.package_id)])
            .await;

        let mut user = self.load_user(&req.user_id).await?;
        let mut package = self.load_package(&req.package_id).await?;

        let now = Utc::now();
        let (stock, coin_price, expire_date, label) = {
            let duration = package
                .duration_mut(&req.duration_label)
                .ok_or_else(|| DomainError::duration_not_found(&req.package_id, &req.duration_label))?;
            if duration.stock_list.is_empty() {
                return Err(DomainError::out_of_stock(&req.package_id, &duration.label));
            }
            if user.coin < duration.coin_price {
                return Err(DomainError::insufficient_balance(
                    duration.coin_price,
                    user.coin,
                ));
            }
            let days = duration.days.unwrap_or(self.config.default_days);
            let expire_date = TimeDelta::try_days(i64::from(days))
                .and_then(|validity| now.checked_add_signed(validity))
                .ok_or_else(|| {
                    DomainError::validation("days", format!("{days} days is out of range"))
                })?;
            let stock = duration.stock_list.remove(0);
            (stock, duration.coin_price, expire_date, duration.label.clone())
        };

        user.coin -= coin_price;
        user.role = user.role.after_purchase();

        let receipt = Receipt {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            package_id: package.id.clone(),
            package_name: package.name.clone(),
            duration_label: label,
            coin_price,
            stock,
            purchase_date: now,
            expire_date,
        };

        self.repos
            .packages
            .save(&package)
            .await
            .map_err(|e| DomainError::persistence("package", format!("{e:#}")))?;

        if let Err(e) = self.repos.users.save(&user).await {
            error!(
                receipt_id = %receipt.id,
                "Stock token consumed but user balance was not debited: {e:#}"
            );
            return Err(DomainError::persistence("user", format!("{e:#}")));
        }

        if let Err(e) = self.repos.purchases.append(&receipt).await {
            error!(
                receipt_id = %receipt.id,
                "User debited and token consumed but receipt was not recorded: {e:#}"
            );
            return Err(DomainError::persistence("receipt", format!("{e:#}")));
        }
        drop(guard);

        if let Err(e) = self
            .notifier
            .purchase_completed(&PurchaseNotice::new(&user, &receipt))
            .await
        {
            warn!("Purchase notification failed (continuing): {e:#}");
        }

        info!(receipt_id = %receipt.id, coin = user.coin, "Purchase fulfilled");
        Ok(receipt)
    }

    #[instrument(name = "shop.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: &str) -> Result<User, DomainError> {
        debug!("Getting user by id");
        self.load_user(id).await
    }

    #[instrument(name = "shop.service.list_packages", skip(self))]
    pub async fn list_packages(&self) -> Result<Vec<Package>, DomainError> {
        let packages = self
            .repos
            .packages
            .list()
            .await
            .map_err(|e| DomainError::persistence("package", format!("{e:#}")))?;
        debug!("Listed {} packages", packages.len());
        Ok(packages)
    }

    #[instrument(name = "shop.service.get_package", skip(self), fields(package_id = %id))]
    pub async fn get_package(&self, id: &str) -> Result<Package, DomainError> {
        debug!("Getting package by id");
        self.load_package(id).await
    }

    /// Receipts of one user, newest first. Unknown users have no receipts.
    #[instrument(
        name = "shop.service.list_user_purchases",
        skip(self),
        fields(user_id = %user_id)
    )]
    pub async fn list_user_purchases(&self, user_id: &str) -> Result<Vec<Receipt>, DomainError> {
        let mut receipts = self
            .repos
            .purchases
            .list_for_user(user_id)
            .await
            .map_err(|e| DomainError::persistence("receipt", format!("{e:#}")))?;
        // Stable sort keeps append order among equal timestamps before reversing.
        receipts.sort_by_key(|r| r.purchase_date);
        receipts.reverse();
        debug!("Found {} purchases", receipts.len());
        Ok(receipts)
    }

    /// Move `amount` coins between two users in one write of the users store,
    /// then log the transfer.
    #[instrument(
        name = "shop.service.transfer",
        skip(self),
        fields(from_user_id = %from_user_id, to_user_id = %to_user_id, amount = amount)
    )]
    pub async fn transfer(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        amount: i64,
    ) -> Result<TransferOutcome, DomainError> {
        info!("Transferring coins");
        if amount <= 0 {
            return Err(DomainError::InvalidAmount { amount });
        }
        let amount = amount.unsigned_abs();
        if from_user_id == to_user_id {
            return Err(DomainError::SelfTransfer {
                id: from_user_id.to_string(),
            });
        }

        let _guard = self
            .locks
            .lock_all([user_key(from_user_id), user_key(to_user_id)])
            .await;

        let mut from = self.load_user(from_user_id).await?;
        let mut to = self.load_user(to_user_id).await?;
        if from.coin < amount {
            return Err(DomainError::insufficient_balance(amount, from.coin));
        }

        from.coin -= amount;
        to.coin = to.coin.saturating_add(amount);

        self.repos
            .users
            .save_all(&[from.clone(), to.clone()])
            .await
            .map_err(|e| DomainError::persistence("user", format!("{e:#}")))?;

        let entry = TransferLogEntry {
            log_id: Uuid::new_v4(),
            from_user_id: from.id.clone(),
            to_user_id: to.id.clone(),
            amount,
            date: Utc::now(),
        };
        if let Err(e) = self.repos.transfers.append(&entry).await {
            error!(log_id = %entry.log_id, "Balances moved but transfer was not logged: {e:#}");
            return Err(DomainError::persistence("transfer", format!("{e:#}")));
        }

        info!(log_id = %entry.log_id, "Transfer completed");
        Ok(TransferOutcome {
            entry,
            from_balance: from.coin,
            to_balance: to.coin,
        })
    }

    /// Transfer log, optionally narrowed to entries sent or received by `user_id`.
    #[instrument(name = "shop.service.list_transfers", skip(self))]
    pub async fn list_transfers(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<TransferLogEntry>, DomainError> {
        let entries = self
            .repos
            .transfers
            .list()
            .await
            .map_err(|e| DomainError::persistence("transfer", format!("{e:#}")))?;
        let entries: Vec<_> = match user_id {
            Some(id) => entries
                .into_iter()
                .filter(|e| e.from_user_id == id || e.to_user_id == id)
                .collect(),
            None => entries,
        };
        debug!("Listed {} transfers", entries.len());
        Ok(entries)
    }

    /// Add a signed `amount` to a user's balance. Never lets it go negative.
    #[instrument(
        name = "shop.service.adjust_balance",
        skip(self),
        fields(user_id = %user_id, amount = amount)
    )]
    pub async fn adjust_balance(
        &self,
        user_id: &str,
        amount: i64,
    ) -> Result<BalanceChange, DomainError> {
        info!("Adjusting balance");
        let _guard = self.locks.lock_all([user_key(user_id)]).await;

        let mut user = self.load_user(user_id).await?;
        let old_balance = user.coin;
        let new_balance = if amount >= 0 {
            old_balance.checked_add(amount.unsigned_abs())
        } else {
            old_balance.checked_sub(amount.unsigned_abs())
        }
        .ok_or(DomainError::NegativeBalance {
            balance: old_balance,
            change: amount,
        })?;

        user.coin = new_balance;
        self.repos
            .users
            .save(&user)
            .await
            .map_err(|e| DomainError::persistence("user", format!("{e:#}")))?;

        info!(old_balance, new_balance, "Balance adjusted");
        Ok(BalanceChange {
            user_id: user.id,
            old_balance,
            new_balance,
            change: amount,
        })
    }

    /// Replace the stock tokens of one duration. Blank tokens are dropped.
    #[instrument(
        name = "shop.service.replace_stock",
        skip(self, stock_list),
        fields(package_id = %package_id, duration_label = %duration_label, count = stock_list.len())
    )]
    pub async fn replace_stock(
        &self,
        package_id: &str,
        duration_label: &str,
        stock_list: Vec<String>,
    ) -> Result<Package, DomainError> {
        info!("Replacing stock");
        let _guard = self.locks.lock_all([package_key(package_id)]).await;

        let mut package = self.load_package(package_id).await?;
        let duration = package
            .duration_mut(duration_label)
            .ok_or_else(|| DomainError::duration_not_found(package_id, duration_label))?;
        duration.stock_list = stock_list
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        let remaining = duration.stock_list.len();

        self.repos
            .packages
            .save(&package)
            .await
            .map_err(|e| DomainError::persistence("package", format!("{e:#}")))?;

        info!(remaining, "Stock replaced");
        Ok(package)
    }

    async fn load_user(&self, id: &str) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::persistence("user", format!("{e:#}")))?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    async fn load_package(&self, id: &str) -> Result<Package, DomainError> {
        self.repos
            .packages
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::persistence("package", format!("{e:#}")))?
            .ok_or_else(|| DomainError::package_not_found(id))
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(())
}
