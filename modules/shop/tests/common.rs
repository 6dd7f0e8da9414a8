#![allow(dead_code)]

use std::path::{Path, PathBuf};

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

use api_ingress::{ApiIngress, ApiIngressConfig, RestfulModule};
use shop::config::ShopConfig;
use shop::Shop;

pub struct TestShop {
    pub home: TempDir,
    pub shop: Shop,
    pub router: Router,
}

impl TestShop {
    pub fn data(&self, file: &str) -> PathBuf {
        self.shop.data_dir().join(file)
    }

    pub fn read_json(&self, file: &str) -> Value {
        let text = std::fs::read_to_string(self.data(file)).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    pub async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

pub fn default_users() -> Value {
    json!({"users": [
        {"id": "100", "name": "alice", "coin": 100, "role": "member", "isBanned": false,
         "email": "alice@example.com", "image": "alice.png"},
        {"id": "200", "name": "bob", "coin": 5, "role": "staff", "isBanned": false},
        {"id": "300", "name": "carol", "coin": 40, "role": "customer", "isBanned": false}
    ]})
}

pub fn default_packages() -> Value {
    json!([
        {
            "id": "vip",
            "name": "VIP",
            "image": "vip.png",
            "durations": [
                {"label": "Monthly", "coinPrice": 50, "days": 30, "stockList": ["A", "B"]},
                {"label": " Premium ", "coinPrice": 10, "stockList": ["P1"]},
                {"label": "Yearly", "coinPrice": 500, "days": 365, "stockList": []}
            ]
        }
    ])
}

pub fn write_json(dir: &Path, file: &str, value: &Value) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(file), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

pub async fn shop_with(users: Value, packages: Value) -> Result<TestShop> {
    let home = tempfile::tempdir()?;
    let data = home.path().join("data");
    write_json(&data, "users.json", &users);
    write_json(&data, "packages.json", &packages);

    let shop = Shop::init(ShopConfig::default(), home.path()).await?;
    let ingress = ApiIngress::new(
        ApiIngressConfig {
            enable_docs: true,
            ..Default::default()
        },
        api_ingress::DEFAULT_REQUEST_TIMEOUT,
    );
    let routes = shop.register_rest(Router::new(), &ingress)?;
    let router = ingress.build_router(routes);
    Ok(TestShop { home, shop, router })
}

pub async fn default_shop() -> Result<TestShop> {
    shop_with(default_users(), default_packages()).await
}
