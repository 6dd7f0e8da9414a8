use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the shop module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShopConfig {
    /// Directory holding the JSON stores; relative paths resolve against the server home dir.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_packages_file")]
    pub packages_file: String,
    #[serde(default = "default_purchases_file")]
    pub purchases_file: String,
    #[serde(default = "default_transfers_file")]
    pub transfers_file: String,
    /// Validity in days of durations that do not set their own.
    #[serde(default = "default_days")]
    pub default_days: u32,
    /// Base URL of the companion bot; purchase notifications are off when unset.
    #[serde(default)]
    pub notify_base_url: Option<String>,
    #[serde(default = "default_notify_timeout", with = "humantime_serde")]
    pub notify_timeout: Duration,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            users_file: default_users_file(),
            packages_file: default_packages_file(),
            purchases_file: default_purchases_file(),
            transfers_file: default_transfers_file(),
            default_days: default_days(),
            notify_base_url: None,
            notify_timeout: default_notify_timeout(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_users_file() -> String {
    "users.json".to_string()
}

fn default_packages_file() -> String {
    "packages.json".to_string()
}

fn default_purchases_file() -> String {
    "userPurchases.json".to_string()
}

fn default_transfers_file() -> String {
    "transferLogs.json".to_string()
}

fn default_days() -> u32 {
    1
}

fn default_notify_timeout() -> Duration {
    Duration::from_secs(5)
}
