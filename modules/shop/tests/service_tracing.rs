//! Tests to verify that the service layer emits expected tracing spans

mod common;

use anyhow::Result;
use tracing_test::traced_test;

use shop::contract::model::PurchaseRequest;

use common::default_shop;

#[tokio::test]
#[traced_test]
async fn fulfill_emits_span_with_ids() -> Result<()> {
    let t = default_shop().await?;
    t.shop
        .service()
        .fulfill(PurchaseRequest {
            user_id: "100".into(),
            package_id: "vip".into(),
            duration_label: "Monthly".into(),
        })
        .await?;

    assert!(logs_contain("shop.service.fulfill"));
    assert!(logs_contain("user_id=100"));
    assert!(logs_contain("package_id=vip"));
    assert!(logs_contain("Purchase fulfilled"));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn failed_precondition_is_logged_by_handler() -> Result<()> {
    let t = default_shop().await?;
    let (status, _) = t
        .call(
            "POST",
            "/purchases",
            Some(serde_json::json!({"userId": "100", "packageId": "vip", "durationLabel": "yearly"})),
        )
        .await;
    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert!(logs_contain("Purchase failed"));
    assert!(logs_contain("out of stock"));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn transfer_and_adjust_emit_spans() -> Result<()> {
    let t = default_shop().await?;
    let svc = t.shop.service();
    svc.transfer("100", "300", 10).await?;
    svc.adjust_balance("200", 3).await?;

    assert!(logs_contain("shop.service.transfer"));
    assert!(logs_contain("shop.service.adjust_balance"));
    assert!(logs_contain("Transfer completed"));
    Ok(())
}
