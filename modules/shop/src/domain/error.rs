use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
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

    #[error("Invalid amount: {amount} (must be positive)")]
    InvalidAmount { amount: i64 },

    #[error("User {id} cannot transfer coins to themselves")]
    SelfTransfer { id: String },

    #[error("Balance of {balance} cannot be changed by {change}: result would be negative")]
    NegativeBalance { balance: u64, change: i64 },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    /// A store read or write failed. `stage` names the document involved.
    #[error("Persistence error ({stage}): {message}")]
    Persistence {
        stage: &'static str,
        message: String,
    },
}

impl DomainError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn package_not_found(id: impl Into<String>) -> Self {
        Self::PackageNotFound { id: id.into() }
    }

    pub fn duration_not_found(package_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::DurationNotFound {
            package_id: package_id.into(),
            label: label.into(),
        }
    }

    pub fn out_of_stock(package_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::OutOfStock {
            package_id: package_id.into(),
            label: label.into(),
        }
    }

    pub fn insufficient_balance(required: u64, available: u64) -> Self {
        Self::InsufficientBalance {
            required,
            available,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn persistence(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Persistence {
            stage,
            message: message.into(),
        }
    }
}
