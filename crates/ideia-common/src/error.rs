//! Error types for the storefront
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

use crate::types::order::OrderStatus;
use crate::types::pricing::PriceField;

/// Result type alias using IdeiaError
pub type Result<T> = std::result::Result<T, IdeiaError>;

/// Unified error type for storefront operations
#[derive(Debug, Error)]
pub enum IdeiaError {
    // Pricing errors
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    // Checkout errors
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    // Order administration errors
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Pricing input errors
///
/// The engine itself never fails; these come from the boundary that turns
/// partial input into a complete configuration.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<PriceField>),
}

fn join_fields(fields: &[PriceField]) -> String {
    fields
        .iter()
        .map(|f| f.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checkout validation errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("customer name and e-mail are required")]
    MissingCustomer,

    #[error("invalid quantity {qty} for product {product_id}")]
    InvalidQuantity { product_id: String, qty: u32 },

    #[error("order amount out of range for product {product_id}")]
    AmountOutOfRange { product_id: String },
}

/// Order administration errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("invalid status '{value}', expected one of: {}", OrderStatus::joined_names())]
    InvalidStatus { value: String },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl IdeiaError {
    /// Whether the error was caused by the caller's input rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IdeiaError::Pricing(_)
                | IdeiaError::Checkout(_)
                | IdeiaError::Order(_)
                | IdeiaError::Validation(_)
        )
    }
}

// Implement From for common external error types
impl From<serde_json::Error> for IdeiaError {
    fn from(err: serde_json::Error) -> Self {
        IdeiaError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for IdeiaError {
    fn from(err: std::io::Error) -> Self {
        IdeiaError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for IdeiaError {
    fn from(err: anyhow::Error) -> Self {
        IdeiaError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_display() {
        let err = IdeiaError::from(PricingError::MissingFields(vec![
            PriceField::GramsConsumed,
            PriceField::MarginPercent,
        ]));
        let msg = err.to_string();
        assert!(msg.contains("consumoGramas, margemLucroPercent"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_invalid_status_lists_values() {
        let err = OrderError::InvalidStatus {
            value: "LOST".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("LOST"));
        assert!(msg.contains("PENDING_PAYMENT"));
        assert!(msg.contains("CANCELLED"));
    }

    #[test]
    fn test_storage_is_server_error() {
        let err = IdeiaError::Storage("disk full".to_string());
        assert!(!err.is_client_error());
    }
}
