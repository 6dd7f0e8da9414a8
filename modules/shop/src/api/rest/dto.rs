use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::model::{
    BalanceChange, Package, PackageDuration, PurchaseRequest, Receipt, TransferLogEntry,
    TransferOutcome, User,
};

/// Body of `POST /purchases`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReq {
    pub user_id: String,
    pub package_id: String,
    pub duration_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDto {
    pub id: String,
    pub user_id: String,
    pub package_id: String,
    pub package_name: String,
    pub duration_label: String,
    pub coin_price: u64,
    /// The delivered stock token.
    pub stock: String,
    pub purchase_date: DateTime<Utc>,
    pub expire_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResponse {
    pub success: bool,
    pub purchase: ReceiptDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub coin: u64,
    pub role: String,
    pub is_banned: bool,
}

/// Public view of a duration. Stock tokens are secret; only their count is shown.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DurationDto {
    pub label: String,
    pub coin_price: u64,
    pub days: Option<u32>,
    pub stock_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PackageDto {
    pub id: String,
    pub name: String,
    pub durations: Vec<DurationDto>,
}

/// Body of `PUT /packages/{id}/stock`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceStockReq {
    pub duration_label: String,
    pub stock_list: Vec<String>,
}

/// Body of `POST /coin-transfer`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferReq {
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub success: bool,
    pub log_id: Uuid,
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: u64,
    pub new_from_balance: u64,
    pub new_to_balance: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferLogDto {
    pub log_id: Uuid,
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: u64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct TransferLogQuery {
    /// Only entries sent or received by this user.
    pub user_id: Option<String>,
}

/// Body of `PUT /users/{id}/slc-balance`. Negative amounts debit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdjustBalanceReq {
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChangeDto {
    pub success: bool,
    pub user_id: String,
    pub old_balance: u64,
    pub new_balance: u64,
    pub change: i64,
}

// Conversion implementations between REST DTOs and contract models

impl From<PurchaseReq> for PurchaseRequest {
    fn from(req: PurchaseReq) -> Self {
        Self {
            user_id: req.user_id,
            package_id: req.package_id,
            duration_label: req.duration_label,
        }
    }
}

impl From<Receipt> for ReceiptDto {
    fn from(r: Receipt) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            package_id: r.package_id,
            package_name: r.package_name,
            duration_label: r.duration_label,
            coin_price: r.coin_price,
            stock: r.stock,
            purchase_date: r.purchase_date,
            expire_date: r.expire_date,
        }
    }
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            coin: u.coin,
            role: u.role.to_string(),
            is_banned: u.is_banned,
        }
    }
}

impl From<PackageDuration> for DurationDto {
    fn from(d: PackageDuration) -> Self {
        Self {
            label: d.label,
            coin_price: d.coin_price,
            days: d.days,
            stock_count: d.stock_list.len(),
        }
    }
}

impl From<Package> for PackageDto {
    fn from(p: Package) -> Self {
        Self {
            id: p.id,
            name: p.name,
            durations: p.durations.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<TransferOutcome> for TransferResponse {
    fn from(o: TransferOutcome) -> Self {
        Self {
            success: true,
            log_id: o.entry.log_id,
            from_user_id: o.entry.from_user_id,
            to_user_id: o.entry.to_user_id,
            amount: o.entry.amount,
            new_from_balance: o.from_balance,
            new_to_balance: o.to_balance,
        }
    }
}

impl From<TransferLogEntry> for TransferLogDto {
    fn from(e: TransferLogEntry) -> Self {
        Self {
            log_id: e.log_id,
            from_user_id: e.from_user_id,
            to_user_id: e.to_user_id,
            amount: e.amount,
            date: e.date,
        }
    }
}

impl From<BalanceChange> for BalanceChangeDto {
    fn from(c: BalanceChange) -> Self {
        Self {
            success: true,
            user_id: c.user_id,
            old_balance: c.old_balance,
            new_balance: c.new_balance,
            change: c.change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn package_dto_hides_stock_tokens() {
        let dto = PackageDto::from(Package {
            id: "p".into(),
            name: "VIP".into(),
            durations: vec![PackageDuration {
                label: "Monthly".into(),
                coin_price: 50,
                days: Some(30),
                stock_list: vec!["SECRET-1".into(), "SECRET-2".into()],
            }],
        });
        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(v["durations"][0]["stockCount"], 2);
        assert_eq!(v["durations"][0]["coinPrice"], 50);
        assert!(!v.to_string().contains("SECRET"));
    }

    #[test]
    fn purchase_request_uses_camel_case() {
        let req: PurchaseReq = serde_json::from_value(json!({
            "userId": "u", "packageId": "p", "durationLabel": "Monthly"
        }))
        .unwrap();
        let req = PurchaseRequest::from(req);
        assert_eq!(req.duration_label, "Monthly");
    }
}
