//! On-disk JSON records.
//!
//! Field names follow the files shared with the companion bot (camelCase).
//! Every record keeps the keys it does not model in `extra`, so rewriting a
//! document never drops data written by other tools.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

type Extra = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub coin: u64,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

/// `users.json`: normally `{"users": [...]}`, a bare array is accepted too and
/// written back in the shape it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UsersDocument {
    Wrapped {
        #[serde(default)]
        users: Vec<UserRecord>,
        #[serde(flatten)]
        extra: Extra,
    },
    Bare(Vec<UserRecord>),
}

impl Default for UsersDocument {
    fn default() -> Self {
        UsersDocument::Wrapped {
            users: Vec::new(),
            extra: Extra::new(),
        }
    }
}

impl UsersDocument {
    pub fn users(&self) -> &[UserRecord] {
        match self {
            UsersDocument::Wrapped { users, .. } | UsersDocument::Bare(users) => users,
        }
    }

    pub fn users_mut(&mut self) -> &mut Vec<UserRecord> {
        match self {
            UsersDocument::Wrapped { users, .. } | UsersDocument::Bare(users) => users,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationRecord {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub coin_price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(default)]
    pub stock_list: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub durations: Vec<DurationRecord>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Entry of `userPurchases.json`. Older entries may lack the fields added
/// with stock fulfillment, hence the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub package_id: String,
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub duration_label: String,
    #[serde(default)]
    pub coin_price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<String>,
    pub purchase_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub log_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub from_user_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub to_user_id: String,
    pub amount: u64,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Extra,
}

fn default_role() -> String {
    "member".to_string()
}

/// Ids written by other tools are sometimes numbers.
fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_user_fields_survive_round_trip() {
        let raw = json!({
            "users": [
                {"id": "42", "name": "ada", "coin": 7, "role": "staff",
                 "isBanned": false, "email": "ada@example.com", "image": "a.png"}
            ],
            "version": 3
        });
        let doc: UsersDocument = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.users()[0].coin, 7);
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn bare_user_array_is_accepted() {
        let doc: UsersDocument = serde_json::from_value(json!([{"id": 1}])).unwrap();
        assert!(matches!(doc, UsersDocument::Bare(_)));
        let u = &doc.users()[0];
        assert_eq!(u.id, "1");
        assert_eq!(u.role, "member");
        assert_eq!(u.coin, 0);
    }

    #[test]
    fn legacy_receipt_without_stock_parses() {
        let r: ReceiptRecord = serde_json::from_value(json!({
            "userId": "u1",
            "packageId": 1700000000000u64,
            "durationLabel": "1 Ay",
            "purchaseDate": "2024-05-01T10:00:00.000Z",
            "packageSnapshot": {"name": "VIP"}
        }))
        .unwrap();
        assert_eq!(r.package_id, "1700000000000");
        assert!(r.stock.is_none());
        assert!(r.extra.contains_key("packageSnapshot"));
    }

    #[test]
    fn duration_keeps_legacy_fields() {
        let raw = json!({"label": "Monthly", "coinPrice": 50, "stockList": ["A"], "stock": 3});
        let d: DurationRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(d.days, None);
        assert_eq!(serde_json::to_value(&d).unwrap(), raw);
    }
}
