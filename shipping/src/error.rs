//! Error type for the shipping domain.

use commerce_shipping_core::storage::StorageError;
use thiserror::Error;

/// Errors raised by shipping operations.
///
/// Unset references (order, shipping method, profile, package type, amount,
/// weight) are never errors; they surface as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShippingError {
    /// A value object was constructed from incomplete or invalid input.
    #[error("{0}")]
    InvalidArgument(String),

    /// Price arithmetic across two different currencies.
    #[error("Currency mismatch: {left} and {right}")]
    CurrencyMismatch {
        /// Currency of the left operand
        left: String,
        /// Currency of the right operand
        right: String,
    },

    /// No package type definition is registered under this id.
    #[error("Unknown package type: {0}")]
    UnknownPackageType(String),

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The storage collaborator failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ShippingError {
    /// Builds the error raised when a required property is empty or absent
    #[must_use]
    pub fn missing_property(property: &str) -> Self {
        Self::InvalidArgument(format!("Missing required property {property}."))
    }
}
