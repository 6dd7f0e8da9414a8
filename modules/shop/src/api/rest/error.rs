use axum::extract::rejection::{JsonRejection, QueryRejection};
use http_problem::ProblemResponse;

use crate::domain::error::DomainError;
use crate::errors::ErrorCode;

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    let code = match e {
        DomainError::UserNotFound { .. } => ErrorCode::shop_user_not_found_v1,
        DomainError::PackageNotFound { .. } => ErrorCode::shop_package_not_found_v1,
        DomainError::DurationNotFound { .. } => ErrorCode::shop_duration_not_found_v1,
        DomainError::OutOfStock { .. } => ErrorCode::shop_out_of_stock_v1,
        DomainError::InsufficientBalance { .. } => ErrorCode::shop_insufficient_balance_v1,
        DomainError::InvalidAmount { .. } => ErrorCode::shop_invalid_amount_v1,
        DomainError::SelfTransfer { .. } => ErrorCode::shop_self_transfer_v1,
        DomainError::NegativeBalance { .. } => ErrorCode::shop_negative_balance_v1,
        DomainError::Validation { .. } => ErrorCode::shop_validation_v1,
        DomainError::Persistence { stage, .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Persistence error occurred");
            return ErrorCode::shop_internal_persistence_v1.respond(
                format!("An internal storage error occurred ({stage})"),
                instance,
            );
        }
    };
    code.respond(e.to_string(), instance)
}

/// Malformed or incomplete JSON body.
pub fn map_json_rejection(rejection: &JsonRejection, instance: &str) -> ProblemResponse {
    ErrorCode::shop_validation_v1.respond(rejection.body_text(), instance)
}

pub fn map_query_rejection(rejection: &QueryRejection, instance: &str) -> ProblemResponse {
    ErrorCode::shop_validation_v1.respond(rejection.body_text(), instance)
}
