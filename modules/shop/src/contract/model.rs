use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Community role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Member,
    Customer,
    Owner,
    Developer,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Customer => "customer",
            Role::Owner => "owner",
            Role::Developer => "developer",
            Role::Staff => "staff",
        }
    }

    /// Role held after a successful purchase. Only members are promoted;
    /// every other role is kept as is.
    pub fn after_purchase(self) -> Self {
        match self {
            Role::Member => Role::Customer,
            other => other,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "customer" => Ok(Role::Customer),
            "owner" => Ok(Role::Owner),
            "developer" => Ok(Role::Developer),
            "staff" => Ok(Role::Staff),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Pure domain user (no serde).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub coin: u64,
    pub role: Role,
    pub is_banned: bool,
}

/// Canonical form used to compare duration labels.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// One purchasable tier of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDuration {
    pub label: String,
    pub coin_price: u64,
    /// Validity period; `None` falls back to the configured default.
    pub days: Option<u32>,
    /// Unconsumed fulfillment tokens, oldest first.
    pub stock_list: Vec<String>,
}

impl PackageDuration {
    pub fn matches_label(&self, label: &str) -> bool {
        normalize_label(&self.label) == normalize_label(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub durations: Vec<PackageDuration>,
}

impl Package {
    /// First duration whose label matches `label` after normalization.
    pub fn duration(&self, label: &str) -> Option<&PackageDuration> {
        self.durations.iter().find(|d| d.matches_label(label))
    }

    pub fn duration_mut(&mut self, label: &str) -> Option<&mut PackageDuration> {
        self.durations.iter_mut().find(|d| d.matches_label(label))
    }
}

/// Inputs of a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub user_id: String,
    pub package_id: String,
    pub duration_label: String,
}

/// Record of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub id: String,
    pub user_id: String,
    pub package_id: String,
    pub package_name: String,
    pub duration_label: String,
    pub coin_price: u64,
    pub stock: String,
    pub purchase_date: DateTime<Utc>,
    pub expire_date: DateTime<Utc>,
}

/// Audit entry of a user-to-user coin transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLogEntry {
    pub log_id: Uuid,
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: u64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub entry: TransferLogEntry,
    pub from_balance: u64,
    pub to_balance: u64,
}

/// Result of an administrative balance adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    pub user_id: String,
    pub old_balance: u64,
    pub new_balance: u64,
    pub change: i64,
}
