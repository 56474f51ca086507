//! Unified error handling.
//!
//! Provides a unified `AppError` type for storefront operations. Each
//! concern keeps its own error enum; `AppError` wraps them so front ends can
//! propagate with `?` and report with `Display`.

use thiserror::Error;

use tienda_core::CartError;

use crate::config::ConfigError;
use crate::services::checkout::CheckoutError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart operation was given an invalid line index.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Reading or writing the store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Checkout did not complete.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Whether the error comes from the caller rather than the environment.
    ///
    /// Caller errors (bad index, invalid checkout form, declined payment)
    /// are reported to the user; the rest are logged as failures.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        match self {
            Self::Cart(_) => true,
            Self::Checkout(err) => err.is_user_facing(),
            Self::Storage(_) | Self::Config(_) => false,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
