use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::domain::ports::{PurchaseNotice, PurchaseNotifier};

/// Wire body of `POST {base}/notify/purchase`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseNotifyBody<'a> {
    user_id: &'a str,
    user_name: &'a str,
    package_id: &'a str,
    package_name: &'a str,
    duration_label: &'a str,
    coin_price: u64,
    purchase_date: DateTime<Utc>,
}

impl<'a> From<&'a PurchaseNotice> for PurchaseNotifyBody<'a> {
    fn from(n: &'a PurchaseNotice) -> Self {
        Self {
            user_id: &n.user_id,
            user_name: &n.user_name,
            package_id: &n.package_id,
            package_name: &n.package_name,
            duration_label: &n.duration_label,
            coin_price: n.coin_price,
            purchase_date: n.purchase_date,
        }
    }
}

/// HTTP adapter implementing the PurchaseNotifier port against the
/// companion bot's API.
pub struct HttpPurchaseNotifier {
    client: reqwest::Client,
    notify_base: Url,
}

impl HttpPurchaseNotifier {
    pub fn new(client: reqwest::Client, notify_base: Url) -> Self {
        Self {
            client,
            notify_base,
        }
    }

    /// Build an adapter with its own client limited to `timeout` per request.
    pub fn with_timeout(notify_base: Url, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build notification HTTP client")?;
        Ok(Self::new(client, notify_base))
    }

    fn endpoint(&self) -> anyhow::Result<Url> {
        let mut url = self.notify_base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("invalid notification base URL '{}'", self.notify_base))?
            .pop_if_empty()
            .extend(&["notify", "purchase"]);
        Ok(url)
    }
}

#[async_trait]
impl PurchaseNotifier for HttpPurchaseNotifier {
    #[instrument(
        name = "shop.http.notify.purchase",
        skip_all,
        fields(notify_base = %self.notify_base, user_id = %notice.user_id)
    )]
    async fn purchase_completed(&self, notice: &PurchaseNotice) -> anyhow::Result<()> {
        let url = self.endpoint()?;
        let response = self
            .client
            .post(url.clone())
            .json(&PurchaseNotifyBody::from(notice))
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("POST {url}: HTTP {status}"));
        }
        debug!(%status, "Purchase notification delivered");
        Ok(())
    }
}
