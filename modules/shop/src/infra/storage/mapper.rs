//! Conversions between on-disk records and contract models.
//!
//! Writing a model back goes through `apply_*`, which only touches the
//! fields the shop owns and leaves everything else in the record as read.

use anyhow::Context;
use serde_json::Map;

use crate::contract::model::{
    Package, PackageDuration, Receipt, Role, TransferLogEntry, User,
};
use crate::infra::storage::entity::{
    DurationRecord, PackageRecord, ReceiptRecord, TransferRecord, UserRecord,
};

pub fn user_from_record(r: &UserRecord) -> anyhow::Result<User> {
    let role: Role = r
        .role
        .parse()
        .with_context(|| format!("user {}", r.id))?;
    Ok(User {
        id: r.id.clone(),
        name: r.name.clone(),
        coin: r.coin,
        role,
        is_banned: r.is_banned,
    })
}

pub fn apply_user(r: &mut UserRecord, u: &User) {
    r.name = u.name.clone();
    r.coin = u.coin;
    // Keep the original spelling unless the role actually changed.
    if r.role.parse::<Role>().ok() != Some(u.role) {
        r.role = u.role.as_str().to_string();
    }
    r.is_banned = u.is_banned;
}

pub fn package_from_record(r: &PackageRecord) -> Package {
    Package {
        id: r.id.clone(),
        name: r.name.clone(),
        durations: r
            .durations
            .iter()
            .map(|d| PackageDuration {
                label: d.label.clone(),
                coin_price: d.coin_price,
                days: d.days,
                stock_list: d.stock_list.clone(),
            })
            .collect(),
    }
}

/// Durations are matched by position; the shop never adds or removes them.
pub fn apply_package(r: &mut PackageRecord, p: &Package) {
    r.name = p.name.clone();
    for (i, d) in p.durations.iter().enumerate() {
        match r.durations.get_mut(i) {
            Some(rec) => {
                rec.label = d.label.clone();
                rec.coin_price = d.coin_price;
                rec.days = d.days;
                rec.stock_list = d.stock_list.clone();
            }
            None => r.durations.push(DurationRecord {
                label: d.label.clone(),
                coin_price: d.coin_price,
                days: d.days,
                stock_list: d.stock_list.clone(),
                extra: Map::new(),
            }),
        }
    }
    r.durations.truncate(p.durations.len());
}

pub fn receipt_from_record(r: ReceiptRecord) -> Receipt {
    Receipt {
        id: r.id,
        user_id: r.user_id,
        package_id: r.package_id,
        package_name: r.package_name,
        duration_label: r.duration_label,
        coin_price: r.coin_price,
        stock: r.stock.unwrap_or_default(),
        purchase_date: r.purchase_date,
        expire_date: r.expire_date.unwrap_or(r.purchase_date),
    }
}

pub fn receipt_to_record(r: &Receipt) -> ReceiptRecord {
    ReceiptRecord {
        id: r.id.clone(),
        user_id: r.user_id.clone(),
        package_id: r.package_id.clone(),
        package_name: r.package_name.clone(),
        duration_label: r.duration_label.clone(),
        coin_price: r.coin_price,
        stock: Some(r.stock.clone()),
        purchase_date: r.purchase_date,
        expire_date: Some(r.expire_date),
        extra: Map::new(),
    }
}

pub fn transfer_from_record(r: TransferRecord) -> anyhow::Result<TransferLogEntry> {
    Ok(TransferLogEntry {
        log_id: r
            .log_id
            .parse()
            .with_context(|| format!("transfer log id '{}'", r.log_id))?,
        from_user_id: r.from_user_id,
        to_user_id: r.to_user_id,
        amount: r.amount,
        date: r.date,
    })
}

pub fn transfer_to_record(e: &TransferLogEntry) -> TransferRecord {
    TransferRecord {
        log_id: e.log_id.to_string(),
        from_user_id: e.from_user_id.clone(),
        to_user_id: e.to_user_id.clone(),
        amount: e.amount,
        date: e.date,
        extra: Map::new(),
    }
}
