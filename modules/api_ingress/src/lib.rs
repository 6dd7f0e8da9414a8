//! HTTP host for the server: owns the listener, the global middleware stack,
//! and the merged OpenAPI document of every REST module registered with it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{middleware::from_fn, routing::get, Router};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// Default handler timeout when the server config does not set one.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// Sink for OpenAPI fragments contributed by REST modules.
pub trait OpenApiRegistry: Send + Sync {
    fn register_doc(&self, doc: OpenApi);
}

/// A module that contributes routes (and their docs) to the HTTP host.
pub trait RestfulModule {
    fn register_rest(&self, router: Router, openapi: &dyn OpenApiRegistry) -> Result<Router>;
}

pub struct ApiIngress {
    config: ApiIngressConfig,
    request_timeout: Duration,
    openapi: Mutex<OpenApi>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default(), DEFAULT_REQUEST_TIMEOUT)
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig, request_timeout: Duration) -> Self {
        let info = InfoBuilder::new()
            .title("SLC Shop API")
            .version(env!("CARGO_PKG_VERSION"))
            .build();
        Self {
            config,
            request_timeout,
            openapi: Mutex::new(OpenApiBuilder::new().info(info).build()),
        }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Snapshot of the merged OpenAPI document.
    pub fn build_openapi(&self) -> OpenApi {
        self.openapi.lock().clone()
    }

    /// Wrap module routes with health/docs endpoints and the middleware stack.
    ///
    /// Layer order, outermost first:
    /// SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions -> Timeout -> CORS -> BodyLimit
    pub fn build_router(&self, routes: Router) -> Router {
        let mut router = routes.route("/health", get(web::health_check));

        if self.config.enable_docs {
            let doc = Arc::new(self.build_openapi());
            tracing::info!(paths = doc.paths.paths.len(), "Serving OpenAPI document");
            router = router
                .route(
                    "/openapi.json",
                    get(move || {
                        let doc = doc.clone();
                        async move { axum::Json((*doc).clone()) }
                    }),
                )
                .route("/docs", get(web::serve_docs));
        }

        // Router::layer wraps everything added so far, so the last layer
        // added is the outermost one.
        router = router.layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES));
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        let x_request_id = request_id::header();
        router
            .layer(TimeoutLayer::new(self.request_timeout))
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(request_id::create_trace_layer())
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind `bind_addr` and serve `router` until `cancel` fires.
    pub async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.config.bind_addr))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server failed")
    }
}

impl OpenApiRegistry for ApiIngress {
    fn register_doc(&self, doc: OpenApi) {
        let mut merged = self.openapi.lock();
        let before = merged.paths.paths.len();
        merged.merge(doc);
        tracing::debug!(
            added = merged.paths.paths.len() - before,
            "Merged module OpenAPI fragment"
        );
    }
}
