use std::sync::Arc;

use api_ingress::OpenApiRegistry;
use axum::{
    routing::{get, post, put},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::purchase,
        handlers::list_user_purchases,
        handlers::get_user,
        handlers::list_packages,
        handlers::get_package,
        handlers::replace_stock,
        handlers::transfer,
        handlers::list_transfers,
        handlers::adjust_balance,
    ),
    components(schemas(
        dto::PurchaseReq,
        dto::PurchaseResponse,
        dto::ReceiptDto,
        dto::UserDto,
        dto::PackageDto,
        dto::DurationDto,
        dto::ReplaceStockReq,
        dto::TransferReq,
        dto::TransferResponse,
        dto::TransferLogDto,
        dto::AdjustBalanceReq,
        dto::BalanceChangeDto,
        http_problem::Problem,
    )),
    tags(
        (name = "purchases", description = "Package purchases and receipts"),
        (name = "packages", description = "Package catalog and stock"),
        (name = "users", description = "Shop users"),
        (name = "coins", description = "SLC coin transfers and balance adjustments"),
    )
)]
pub struct ShopApiDoc;

pub fn register_routes(
    router: Router,
    openapi: &dyn OpenApiRegistry,
    service: Arc<Service>,
) -> anyhow::Result<Router> {
    openapi.register_doc(ShopApiDoc::openapi());

    let routes = Router::new()
        .route("/purchases", post(handlers::purchase))
        .route("/users/{id}", get(handlers::get_user))
        .route("/users/{id}/purchases", get(handlers::list_user_purchases))
        .route("/users/{id}/slc-balance", put(handlers::adjust_balance))
        .route("/packages", get(handlers::list_packages))
        .route("/packages/{id}", get(handlers::get_package))
        .route("/packages/{id}/stock", put(handlers::replace_stock))
        .route("/coin-transfer", post(handlers::transfer))
        .route("/transfer-logs", get(handlers::list_transfers))
        .layer(Extension(service));

    Ok(router.merge(routes))
}
