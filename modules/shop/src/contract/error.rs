use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopError {
    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Package not found: {id}")]
    PackageNotFound { id: String },

    #[error("Duration '{label}' not found in package {package_id}")]
    DurationNotFound { package_id: String, label: String },

    #[error("Duration '{label}' of package {package_id} is out of stock")]
    OutOfStock { package_id: String, label: String },

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl ShopError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for ShopError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::UserNotFound { id },
            PackageNotFound { id } => Self::PackageNotFound { id },
            DurationNotFound { package_id, label } => Self::DurationNotFound { package_id, label },
            OutOfStock { package_id, label } => Self::OutOfStock { package_id, label },
            InsufficientBalance {
                required,
                available,
            } => Self::InsufficientBalance {
                required,
                available,
            },
            e @ (InvalidAmount { .. }
            | SelfTransfer { .. }
            | NegativeBalance { .. }
            | Validation { .. }) => Self::validation(e.to_string()),
            Persistence { .. } => Self::Internal,
        }
    }
}
