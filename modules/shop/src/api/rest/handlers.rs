use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query,
    },
    http::Uri,
    response::Json,
    Extension,
};
use http_problem::{Problem, ProblemResponse};
use tracing::{error, info};

use crate::api::rest::dto::{
    AdjustBalanceReq, BalanceChangeDto, PackageDto, PurchaseReq, PurchaseResponse, ReceiptDto,
    ReplaceStockReq, TransferLogDto, TransferLogQuery, TransferReq, TransferResponse, UserDto,
};
use crate::api::rest::error::{map_domain_error, map_json_rejection, map_query_rejection};
use crate::domain::service::Service;

type Svc = Extension<Arc<Service>>;

/// Buy one stock token of a package duration
#[utoipa::path(
    post,
    path = "/purchases",
    operation_id = "shop.purchase",
    tag = "purchases",
    request_body = PurchaseReq,
    responses(
        (status = 200, description = "Purchase fulfilled", body = PurchaseResponse),
        (status = 400, description = "Out of stock, insufficient balance or bad request", body = Problem),
        (status = 404, description = "User, package or duration not found", body = Problem),
        (status = 500, description = "Storage failure", body = Problem)
    )
)]
pub async fn purchase(
    uri: Uri,
    Extension(svc): Svc,
    body: Result<Json<PurchaseReq>, JsonRejection>,
) -> Result<Json<PurchaseResponse>, ProblemResponse> {
    let Json(req) = body.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!("Purchase request: {:?}", req);

    match svc.fulfill(req.into()).await {
        Ok(receipt) => Ok(Json(PurchaseResponse {
            success: true,
            purchase: receipt.into(),
        })),
        Err(e) => {
            error!("Purchase failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List a user's purchases, newest first
#[utoipa::path(
    get,
    path = "/users/{id}/purchases",
    operation_id = "shop.list_user_purchases",
    tag = "purchases",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Receipts of the user", body = [ReceiptDto]),
        (status = 500, description = "Storage failure", body = Problem)
    )
)]
pub async fn list_user_purchases(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<String>,
) -> Result<Json<Vec<ReceiptDto>>, ProblemResponse> {
    match svc.list_user_purchases(&id).await {
        Ok(receipts) => Ok(Json(receipts.into_iter().map(Into::into).collect())),
        Err(e) => {
            error!("Failed to list purchases of {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    operation_id = "shop.get_user",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "Not Found", body = Problem),
        (status = 500, description = "Storage failure", body = Problem)
    )
)]
pub async fn get_user(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, ProblemResponse> {
    match svc.get_user(&id).await {
        Ok(user) => Ok(Json(user.into())),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List the package catalog
#[utoipa::path(
    get,
    path = "/packages",
    operation_id = "shop.list_packages",
    tag = "packages",
    responses(
        (status = 200, description = "All packages", body = [PackageDto]),
        (status = 500, description = "Storage failure", body = Problem)
    )
)]
pub async fn list_packages(
    uri: Uri,
    Extension(svc): Svc,
) -> Result<Json<Vec<PackageDto>>, ProblemResponse> {
    match svc.list_packages().await {
        Ok(packages) => Ok(Json(packages.into_iter().map(Into::into).collect())),
        Err(e) => {
            error!("Failed to list packages: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a package by id
#[utoipa::path(
    get,
    path = "/packages/{id}",
    operation_id = "shop.get_package",
    tag = "packages",
    params(("id" = String, Path, description = "Package id")),
    responses(
        (status = 200, description = "Package found", body = PackageDto),
        (status = 404, description = "Not Found", body = Problem),
        (status = 500, description = "Storage failure", body = Problem)
    )
)]
pub async fn get_package(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<String>,
) -> Result<Json<PackageDto>, ProblemResponse> {
    match svc.get_package(&id).await {
        Ok(package) => Ok(Json(package.into())),
        Err(e) => {
            error!("Failed to get package {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Replace the stock tokens of one duration
#[utoipa::path(
    put,
    path = "/packages/{id}/stock",
    operation_id = "shop.replace_stock",
    tag = "packages",
    params(("id" = String, Path, description = "Package id")),
    request_body = ReplaceStockReq,
    responses(
        (status = 200, description = "Updated package", body = PackageDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 404, description = "Package or duration not found", body = Problem),
        (status = 500, description = "Storage failure", body = Problem)
    )
)]
pub async fn replace_stock(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<String>,
    body: Result<Json<ReplaceStockReq>, JsonRejection>,
) -> Result<Json<PackageDto>, ProblemResponse> {
    let Json(req) = body.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!(
        "Replacing stock of {} '{}' with {} tokens",
        id,
        req.duration_label,
        req.stock_list.len()
    );

    match svc
        .replace_stock(&id, &req.duration_label, req.stock_list)
        .await
    {
        Ok(package) => Ok(Json(package.into())),
        Err(e) => {
            error!("Failed to replace stock of {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Move coins from one user to another
#[utoipa::path(
    post,
    path = "/coin-transfer",
    operation_id = "shop.transfer",
    tag = "coins",
    request_body = TransferReq,
    responses(
        (status = 200, description = "Transfer completed", body = TransferResponse),
        (status = 400, description = "Invalid amount, self transfer or insufficient balance", body = Problem),
        (status = 404, description = "User not found", body = Problem),
        (status = 500, description = "Storage failure", body = Problem)
    )
)]
pub async fn transfer(
    uri: Uri,
    Extension(svc): Svc,
    body: Result<Json<TransferReq>, JsonRejection>,
) -> Result<Json<TransferResponse>, ProblemResponse> {
    let Json(req) = body.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!("Transfer request: {:?}", req);

    match svc
        .transfer(&req.from_user_id, &req.to_user_id, req.amount)
        .await
    {
        Ok(outcome) => Ok(Json(outcome.into())),
        Err(e) => {
            error!("Transfer failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List coin transfers
#[utoipa::path(
    get,
    path = "/transfer-logs",
    operation_id = "shop.list_transfers",
    tag = "coins",
    params(TransferLogQuery),
    responses(
        (status = 200, description = "Transfer log", body = [TransferLogDto]),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 500, description = "Storage failure", body = Problem)
    )
)]
pub async fn list_transfers(
    uri: Uri,
    Extension(svc): Svc,
    query: Result<Query<TransferLogQuery>, QueryRejection>,
) -> Result<Json<Vec<TransferLogDto>>, ProblemResponse> {
    let Query(query) = query.map_err(|r| map_query_rejection(&r, uri.path()))?;

    match svc.list_transfers(query.user_id.as_deref()).await {
        Ok(entries) => Ok(Json(entries.into_iter().map(Into::into).collect())),
        Err(e) => {
            error!("Failed to list transfers: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Add a signed amount to a user's balance
#[utoipa::path(
    put,
    path = "/users/{id}/slc-balance",
    operation_id = "shop.adjust_balance",
    tag = "coins",
    params(("id" = String, Path, description = "User id")),
    request_body = AdjustBalanceReq,
    responses(
        (status = 200, description = "Balance adjusted", body = BalanceChangeDto),
        (status = 400, description = "Result would be negative or bad request", body = Problem),
        (status = 404, description = "User not found", body = Problem),
        (status = 500, description = "Storage failure", body = Problem)
    )
)]
pub async fn adjust_balance(
    uri: Uri,
    Extension(svc): Svc,
    Path(id): Path<String>,
    body: Result<Json<AdjustBalanceReq>, JsonRejection>,
) -> Result<Json<BalanceChangeDto>, ProblemResponse> {
    let Json(req) = body.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!("Adjusting balance of {} by {}", id, req.amount);

    match svc.adjust_balance(&id, req.amount).await {
        Ok(change) => Ok(Json(change.into())),
        Err(e) => {
            error!("Failed to adjust balance of {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
