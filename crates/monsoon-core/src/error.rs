//! # Error Types
//!
//! Domain-specific error types for monsoon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  monsoon-core errors (this file)                                       │
//! │  ├── CoreError        - Rate engine and lifecycle failures             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  monsoon-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  monsoon-checkout errors (separate crate)                              │
//! │  ├── ConfigError      - Admin writes rejected before the swap          │
//! │  ├── CaptureError     - Opaque payment-gateway failures                │
//! │  └── CheckoutError    - Flow-level aggregation of the above            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (postal code, order id, status)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// A caller can always tell "already done" from "wrong order": the illegal
/// transition variant carries the status the order is actually in.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Postal code is neither a well-formed domestic PIN nor recognizably
    /// international. Callers must not proceed to charge.
    #[error("Invalid postal code '{code}': {reason}")]
    InvalidPostalCode { code: String, reason: String },

    /// Lifecycle transition not valid from the order's current status.
    ///
    /// ## When This Occurs
    /// - Confirming a remainder before the advance
    /// - Any transition on a fully-paid or cancelled order
    /// - A second confirmation racing a first one
    #[error("Order {order_id} is {status:?}, cannot {action}")]
    IllegalTransition {
        order_id: String,
        status: OrderStatus,
        action: String,
    },

    /// Order creation with no line items.
    #[error("Order must contain at least one line item")]
    EmptyOrder,

    /// Cash-on-delivery requested where the policy does not offer it.
    #[error("Cash on delivery is not available: {reason}")]
    CodNotAvailable { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
