//! Concurrent workflows against the JSON-file stores.

mod common;

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use shop::contract::model::PurchaseRequest;
use shop::domain::error::DomainError;

use common::shop_with;

fn request(user: &str) -> PurchaseRequest {
    PurchaseRequest {
        user_id: user.to_string(),
        package_id: "vip".to_string(),
        duration_label: "monthly".to_string(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn last_token_goes_to_exactly_one_buyer() -> Result<()> {
    let t = shop_with(
        json!({"users": [
            {"id": "a", "name": "a", "coin": 100, "role": "member"},
            {"id": "b", "name": "b", "coin": 100, "role": "member"}
        ]}),
        json!([{"id": "vip", "name": "VIP", "durations": [
            {"label": "Monthly", "coinPrice": 30, "stockList": ["ONLY"]}
        ]}]),
    )
    .await?;
    let svc = t.shop.service();

    let (ra, rb) = tokio::join!(
        tokio::spawn({
            let svc = svc.clone();
            async move { svc.fulfill(request("a")).await }
        }),
        tokio::spawn({
            let svc = svc.clone();
            async move { svc.fulfill(request("b")).await }
        }),
    );
    let results = [ra?, rb?];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(DomainError::OutOfStock { .. }))));

    let users = t.read_json("users.json");
    let coins: u64 = users["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["coin"].as_u64().unwrap())
        .sum();
    assert_eq!(coins, 170);
    assert_eq!(t.read_json("userPurchases.json").as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_purchases_by_one_user_never_overdraw() -> Result<()> {
    let t = shop_with(
        json!({"users": [{"id": "a", "name": "a", "coin": 100, "role": "member"}]}),
        json!([{"id": "vip", "name": "VIP", "durations": [
            {"label": "Monthly", "coinPrice": 30, "stockList": ["1", "2", "3", "4", "5"]}
        ]}]),
    )
    .await?;
    let svc = t.shop.service();

    let mut tasks = Vec::new();
    for _ in 0..5 {
        let svc = Arc::clone(&svc);
        tasks.push(tokio::spawn(async move { svc.fulfill(request("a")).await }));
    }
    let mut ok = 0;
    for task in tasks {
        match task.await? {
            Ok(_) => ok += 1,
            Err(DomainError::InsufficientBalance { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(ok, 3);
    let users = t.read_json("users.json");
    assert_eq!(users["users"][0]["coin"], 10);
    let packages = t.read_json("packages.json");
    assert_eq!(packages[0]["durations"][0]["stockList"], json!(["4", "5"]));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn crossing_transfers_do_not_deadlock_or_lose_coins() -> Result<()> {
    let t = shop_with(
        json!({"users": [
            {"id": "a", "name": "a", "coin": 50, "role": "member"},
            {"id": "b", "name": "b", "coin": 50, "role": "member"}
        ]}),
        json!([]),
    )
    .await?;
    let svc = t.shop.service();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let svc = Arc::clone(&svc);
        let (from, to) = if i % 2 == 0 { ("a", "b") } else { ("b", "a") };
        tasks.push(tokio::spawn(async move { svc.transfer(from, to, 1).await }));
    }
    for task in tasks {
        task.await??;
    }

    let users = t.read_json("users.json");
    assert_eq!(users["users"][0]["coin"], 50);
    assert_eq!(users["users"][1]["coin"], 50);
    assert_eq!(t.read_json("transferLogs.json").as_array().map(Vec::len), Some(20));
    Ok(())
}
