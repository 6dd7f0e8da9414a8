use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use api_ingress::{OpenApiRegistry, RestfulModule};
use tracing::{debug, info};
use url::Url;

use crate::api::rest::routes;
use crate::config::ShopConfig;
use crate::contract::client::ShopApi;
use crate::domain::ports::{NoopNotifier, PurchaseNotifier};
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::ShopLocalClient;
use crate::infra::notify::HttpPurchaseNotifier;
use crate::infra::storage::JsonStores;

/// The shop module: JSON stores wired to the domain service, exposed over
/// REST and through the in-process `ShopApi` client.
#[derive(Clone)]
pub struct Shop {
    service: Arc<Service>,
    data_dir: PathBuf,
}

impl Shop {
    /// Build the module from its config section. Relative `data_dir` values
    /// resolve against `home_dir`.
    pub async fn init(cfg: ShopConfig, home_dir: &Path) -> anyhow::Result<Self> {
        info!("Initializing shop module");

        let data_dir = resolve_data_dir(&cfg.data_dir, home_dir);
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("create data dir {}", data_dir.display()))?;
        debug!(
            data_dir = %data_dir.display(),
            default_days = cfg.default_days,
            "Loaded shop config"
        );

        let stores = JsonStores::open(
            &data_dir,
            &cfg.users_file,
            &cfg.packages_file,
            &cfg.purchases_file,
            &cfg.transfers_file,
        );

        let notifier: Arc<dyn PurchaseNotifier> = match cfg.notify_base_url.as_deref() {
            Some(base) if !base.trim().is_empty() => {
                let base = Url::parse(base)
                    .with_context(|| format!("invalid shop.notify_base_url '{base}'"))?;
                info!(notify_base = %base, "Purchase notifications enabled");
                Arc::new(HttpPurchaseNotifier::with_timeout(base, cfg.notify_timeout)?)
            }
            _ => Arc::new(NoopNotifier),
        };

        let service = Service::new(
            stores.repositories(),
            notifier,
            ServiceConfig {
                default_days: cfg.default_days,
            },
        );

        Ok(Self {
            service: Arc::new(service),
            data_dir,
        })
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn ShopApi> {
        Arc::new(ShopLocalClient::new(self.service.clone()))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl RestfulModule for Shop {
    fn register_rest(
        &self,
        router: axum::Router,
        openapi: &dyn OpenApiRegistry,
    ) -> anyhow::Result<axum::Router> {
        info!("Registering shop REST routes");
        let router = routes::register_routes(router, openapi, self.service.clone())?;
        info!("Shop REST routes registered successfully");
        Ok(router)
    }
}

fn resolve_data_dir(data_dir: &str, home_dir: &Path) -> PathBuf {
    let p = Path::new(data_dir);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        home_dir.join(p)
    }
}
