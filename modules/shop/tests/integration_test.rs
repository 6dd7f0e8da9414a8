//! End-to-end tests through the REST router over real JSON files.

mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::default_shop;

fn purchase_body(user: &str, pkg: &str, label: &str) -> serde_json::Value {
    json!({"userId": user, "packageId": pkg, "durationLabel": label})
}

#[tokio::test]
async fn purchase_happy_path_updates_all_stores() -> Result<()> {
    let t = default_shop().await?;

    let (status, body) = t
        .call("POST", "/purchases", Some(purchase_body("100", "vip", "monthly")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["purchase"]["stock"], "A");
    assert_eq!(body["purchase"]["coinPrice"], 50);
    assert_eq!(body["purchase"]["packageName"], "VIP");

    let users = t.read_json("users.json");
    assert_eq!(users["users"][0]["coin"], 50);
    assert_eq!(users["users"][0]["role"], "customer");
    // Fields the shop does not model survive the rewrite.
    assert_eq!(users["users"][0]["email"], "alice@example.com");

    let packages = t.read_json("packages.json");
    assert_eq!(packages[0]["durations"][0]["stockList"], json!(["B"]));
    assert_eq!(packages[0]["image"], "vip.png");

    let receipts = t.read_json("userPurchases.json");
    assert_eq!(receipts.as_array().map(Vec::len), Some(1));
    assert_eq!(receipts[0]["userId"], "100");
    assert_eq!(receipts[0]["stock"], "A");
    Ok(())
}

#[tokio::test]
async fn label_matching_ignores_case_and_whitespace() -> Result<()> {
    let t = default_shop().await?;
    let (status, body) = t
        .call("POST", "/purchases", Some(purchase_body("100", "vip", "premium")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["purchase"]["stock"], "P1");
    Ok(())
}

#[tokio::test]
async fn precondition_failures_use_documented_statuses() -> Result<()> {
    let t = default_shop().await?;

    let cases = [
        (purchase_body("999", "vip", "monthly"), StatusCode::NOT_FOUND, "shop.user.not_found.v1"),
        (purchase_body("100", "nope", "monthly"), StatusCode::NOT_FOUND, "shop.package.not_found.v1"),
        (purchase_body("100", "vip", "weekly"), StatusCode::NOT_FOUND, "shop.duration.not_found.v1"),
        (purchase_body("100", "vip", "yearly"), StatusCode::BAD_REQUEST, "shop.stock.out_of_stock.v1"),
        (purchase_body("200", "vip", "monthly"), StatusCode::BAD_REQUEST, "shop.balance.insufficient.v1"),
    ];
    for (body, expected, code) in cases {
        let (status, problem) = t.call("POST", "/purchases", Some(body)).await;
        assert_eq!(status, expected);
        assert_eq!(problem["code"], code);
        assert_eq!(problem["instance"], "/purchases");
    }

    // Nothing changed.
    let users = t.read_json("users.json");
    assert_eq!(users["users"][1]["coin"], 5);
    let packages = t.read_json("packages.json");
    assert_eq!(packages[0]["durations"][0]["stockList"], json!(["A", "B"]));
    assert!(!t.data("userPurchases.json").exists());
    Ok(())
}

#[tokio::test]
async fn malformed_purchase_body_is_a_problem() -> Result<()> {
    let t = default_shop().await?;
    let (status, problem) = t
        .call("POST", "/purchases", Some(json!({"userId": "100"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "shop.request.validation.v1");
    Ok(())
}

#[tokio::test]
async fn purchases_are_listed_newest_first() -> Result<()> {
    let t = default_shop().await?;
    t.call("POST", "/purchases", Some(purchase_body("100", "vip", "premium")))
        .await;
    t.call("POST", "/purchases", Some(purchase_body("100", "vip", "monthly")))
        .await;

    let (status, list) = t.call("GET", "/users/100/purchases", None).await;
    assert_eq!(status, StatusCode::OK);
    let stocks: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["stock"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(stocks, vec!["A", "P1"]);

    let (_, empty) = t.call("GET", "/users/300/purchases", None).await;
    assert_eq!(empty, json!([]));
    Ok(())
}

#[tokio::test]
async fn catalog_reads_hide_stock_tokens() -> Result<()> {
    let t = default_shop().await?;

    let (status, packages) = t.call("GET", "/packages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(packages[0]["durations"][0]["stockCount"], 2);
    assert!(packages[0]["durations"][0].get("stockList").is_none());

    let (status, pkg) = t.call("GET", "/packages/vip", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pkg["name"], "VIP");

    let (status, _) = t.call("GET", "/packages/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, user) = t.call("GET", "/users/200", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["role"], "staff");
    assert_eq!(user["isBanned"], false);
    Ok(())
}

#[tokio::test]
async fn stock_replacement_refills_a_duration() -> Result<()> {
    let t = default_shop().await?;

    let (status, pkg) = t
        .call(
            "PUT",
            "/packages/vip/stock",
            Some(json!({"durationLabel": "YEARLY", "stockList": ["Y1", " ", "Y2"]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pkg["durations"][2]["stockCount"], 2);

    let (status, body) = t
        .call("POST", "/purchases", Some(purchase_body("100", "vip", "Monthly")))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let packages = t.read_json("packages.json");
    assert_eq!(packages[0]["durations"][2]["stockList"], json!(["Y1", "Y2"]));
    Ok(())
}

#[tokio::test]
async fn coin_transfer_conserves_balance_and_logs() -> Result<()> {
    let t = default_shop().await?;

    let (status, body) = t
        .call(
            "POST",
            "/coin-transfer",
            Some(json!({"fromUserId": "100", "toUserId": "200", "amount": 30})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newFromBalance"], 70);
    assert_eq!(body["newToBalance"], 35);

    let users = t.read_json("users.json");
    let total: u64 = users["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["coin"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 145);

    let (_, logs) = t.call("GET", "/transfer-logs?userId=200", None).await;
    assert_eq!(logs.as_array().map(Vec::len), Some(1));
    assert_eq!(logs[0]["amount"], 30);

    let (_, none) = t.call("GET", "/transfer-logs?userId=300", None).await;
    assert_eq!(none, json!([]));
    Ok(())
}

#[tokio::test]
async fn coin_transfer_rejections() -> Result<()> {
    let t = default_shop().await?;
    let cases = [
        (json!({"fromUserId": "100", "toUserId": "200", "amount": 0}), StatusCode::BAD_REQUEST),
        (json!({"fromUserId": "100", "toUserId": "100", "amount": 5}), StatusCode::BAD_REQUEST),
        (json!({"fromUserId": "100", "toUserId": "999", "amount": 5}), StatusCode::NOT_FOUND),
        (json!({"fromUserId": "200", "toUserId": "100", "amount": 6}), StatusCode::BAD_REQUEST),
    ];
    for (body, expected) in cases {
        let (status, _) = t.call("POST", "/coin-transfer", Some(body)).await;
        assert_eq!(status, expected);
    }
    assert!(!t.data("transferLogs.json").exists());
    Ok(())
}

#[tokio::test]
async fn balance_adjustment_rejects_negative_result() -> Result<()> {
    let t = default_shop().await?;

    let (status, body) = t
        .call("PUT", "/users/300/slc-balance", Some(json!({"amount": -15})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["oldBalance"], 40);
    assert_eq!(body["newBalance"], 25);
    assert_eq!(body["change"], -15);

    let (status, problem) = t
        .call("PUT", "/users/300/slc-balance", Some(json!({"amount": -26})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "shop.balance.negative.v1");

    let (status, _) = t
        .call("PUT", "/users/999/slc-balance", Some(json!({"amount": 1})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let users = t.read_json("users.json");
    assert_eq!(users["users"][2]["coin"], 25);
    Ok(())
}

#[tokio::test]
async fn corrupt_store_is_a_500_without_details() -> Result<()> {
    let t = default_shop().await?;
    std::fs::write(t.data("packages.json"), "{ broken")?;

    let (status, problem) = t
        .call("POST", "/purchases", Some(purchase_body("100", "vip", "monthly")))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(problem["code"], "shop.internal.persistence.v1");
    assert!(!problem["detail"].as_str().unwrap_or_default().contains("broken"));
    Ok(())
}

#[tokio::test]
async fn openapi_lists_shop_paths() -> Result<()> {
    let t = default_shop().await?;
    let (status, doc) = t.call("GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    for path in [
        "/purchases",
        "/users/{id}",
        "/users/{id}/purchases",
        "/users/{id}/slc-balance",
        "/packages",
        "/packages/{id}",
        "/packages/{id}/stock",
        "/coin-transfer",
        "/transfer-logs",
    ] {
        assert!(doc["paths"].get(path).is_some(), "missing {path}");
    }
    Ok(())
}
