//! # Checkout Error Types
//!
//! Errors for the orchestration layer. The pure core reports its own
//! failures; this module adds the collaborator failures (config writes,
//! payment capture, storage) and one aggregate for the checkout flow.

use thiserror::Error;

use monsoon_core::{CoreError, ValidationError};

// =============================================================================
// Configuration Error
// =============================================================================

/// An admin settings write rejected before the swap.
///
/// The live record is untouched when this is returned: readers keep seeing
/// the previous whole record.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field failed validation.
    #[error("Configuration rejected: {0}")]
    Rejected(#[from] ValidationError),
}

// =============================================================================
// Capture Error
// =============================================================================

/// Opaque failure from the payment collaborator.
///
/// Surfaced as-is and never retried here; retry policy belongs to the
/// caller.
#[derive(Debug, Error)]
#[error("Payment capture failed via {provider}: {message}")]
pub struct CaptureError {
    /// Which gateway reported the failure.
    pub provider: String,
    /// Provider message, passed through verbatim.
    pub message: String,
}

// =============================================================================
// Checkout Error
// =============================================================================

/// Anything the checkout flow can fail with.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Rate engine or lifecycle failure (invalid postal code, illegal
    /// transition, validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The payment collaborator declined or errored.
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// The persistence collaborator failed.
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),

    /// No order with this id is being tracked.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// An order with this id is already being tracked.
    #[error("Order already exists: {0}")]
    DuplicateOrder(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_error_message() {
        let err = CaptureError {
            provider: "mock".to_string(),
            message: "card declined".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Payment capture failed via mock: card declined"
        );
    }

    #[test]
    fn test_config_error_carries_field() {
        let err = ConfigError::Rejected(ValidationError::MustNotBeNegative {
            field: "base_rate".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration rejected: base_rate must not be negative"
        );
    }
}
