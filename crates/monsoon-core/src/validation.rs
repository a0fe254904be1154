//! # Validation Module
//!
//! Input validation utilities shared by the rate engine, the order
//! lifecycle, and the admin settings writers.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront (TypeScript)                                      │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (Rust)                                           │
//! │  ├── Fails fast on negative money/weight rather than clamping,         │
//! │  │   so upstream bugs surface instead of being masked                  │
//! │  └── Whole-record checks before an admin config swap                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL / CHECK constraints                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::{Money, Weight};
use crate::types::{CodPolicy, LineItem, ShippingConfig};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Basis points in a whole (100%).
pub const MAX_FRACTION_BPS: u32 = 10_000;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a monetary field that may be zero but never negative.
///
/// ## Example
/// ```rust
/// use monsoon_core::money::Money;
/// use monsoon_core::validation::validate_money_not_negative;
///
/// assert!(validate_money_not_negative("base_rate", Money::from_rupees(50)).is_ok());
/// assert!(validate_money_not_negative("base_rate", Money::from_paise(-1)).is_err());
/// ```
pub fn validate_money_not_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a weight field that may be zero but never negative.
pub fn validate_weight_not_negative(field: &str, weight: Weight) -> ValidationResult<()> {
    if weight.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a basis-point fraction (0% to 100%).
pub fn validate_fraction_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > MAX_FRACTION_BPS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_FRACTION_BPS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a whole shipping configuration before it is swapped in.
///
/// Checks every monetary field including each zone override, so a bad
/// record is rejected as a whole and readers never see it.
pub fn validate_shipping_config(config: &ShippingConfig) -> ValidationResult<()> {
    validate_money_not_negative("base_rate", config.base_rate)?;
    validate_money_not_negative("per_kg_rate", config.per_kg_rate)?;
    validate_money_not_negative("free_shipping_threshold", config.free_shipping_threshold)?;

    for (zone, rates) in &config.zone_overrides {
        validate_money_not_negative(&format!("zone_overrides.{zone}"), rates.base_rate)?;
    }

    Ok(())
}

/// Validates a whole COD policy before it is swapped in.
pub fn validate_cod_policy(policy: &CodPolicy) -> ValidationResult<()> {
    validate_money_not_negative("minimum_advance", policy.minimum_advance)?;
    validate_fraction_bps("advance_fraction_bps", policy.advance_fraction_bps)?;

    if policy.enabled && policy.allowed_zones.is_empty() {
        return Err(ValidationError::Required {
            field: "allowed_zones".to_string(),
        });
    }

    Ok(())
}

/// Validates one line item at order creation.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_sku(&item.sku)?;
    validate_quantity(item.quantity)?;
    validate_money_not_negative("unit_price", item.unit_price)?;
    validate_weight_not_negative("unit_weight", item.unit_weight)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
