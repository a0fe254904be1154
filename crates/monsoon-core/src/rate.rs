//! # Shipping Rate Engine
//!
//! Computes a [`ShipmentQuote`] from the live configuration and a shipment
//! descriptor. This is the single source of truth for the shipping formula;
//! the storefront, the admin preview, and order creation all call the same
//! function.
//!
//! ## Quote Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quote_shipment(config, postal_code, subtotal, weight)                  │
//! │                                                                         │
//! │  1. Reject negative subtotal/weight (fail fast, never clamp)           │
//! │  2. Classify postal code → zone (or InvalidPostalCode)                 │
//! │  3. base = zone override, falling back to the global base rate         │
//! │  4. surcharge = per_kg × max(0, weight − 1 kg), prorated per gram      │
//! │  5. raw = base + surcharge                                             │
//! │  6. free? scope covers zone AND subtotal ≥ threshold                   │
//! │  7. total = free ? ₹0 : raw rounded to the rupee                       │
//! │  8. estimated days = static per-zone lookup                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure function: no I/O, no clock, no globals. Identical inputs always
//! produce identical quotes, which is what makes the quote snapshot on an
//! order trustworthy.

use crate::error::CoreResult;
use crate::money::{Money, Weight};
use crate::types::{FreeShippingScope, ShipmentQuote, ShippingConfig, Zone};
use crate::validation::{validate_money_not_negative, validate_weight_not_negative};
use crate::zone::classify_postal_code;

/// Computes a shipping quote for one shipment.
///
/// ## Arguments
/// * `config` - the current shipping configuration (whole record)
/// * `postal_code` - destination postal code, validated here
/// * `subtotal` - order subtotal, drives free-shipping eligibility
/// * `total_weight` - aggregate cart weight; the first kilogram rides free
///
/// ## Errors
/// * `InvalidPostalCode` for malformed destinations
/// * `Validation` for negative subtotal or weight
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use monsoon_core::money::{Money, Weight};
/// use monsoon_core::rate::quote_shipment;
/// use monsoon_core::types::ShippingConfig;
///
/// let config = ShippingConfig::standard_rates(Utc::now());
/// let quote = quote_shipment(&config, "682001", Money::from_rupees(600), Weight::from_kg(1.5))
///     .unwrap();
/// assert!(quote.is_free); // ₹600 ≥ ₹500 threshold, Kerala in scope
/// ```
pub fn quote_shipment(
    config: &ShippingConfig,
    postal_code: &str,
    subtotal: Money,
    total_weight: Weight,
) -> CoreResult<ShipmentQuote> {
    validate_money_not_negative("subtotal", subtotal)?;
    validate_weight_not_negative("total_weight", total_weight)?;

    let zone = classify_postal_code(postal_code)?;
    let base_rate = config.base_rate_for(zone);

    // One free kilogram off the aggregate weight, then prorate by the gram.
    let weight_surcharge = config
        .per_kg_rate
        .per_kilogram(total_weight.billable_beyond_first_kg());

    let raw_total = base_rate + weight_surcharge;

    let is_free = free_shipping_applies(config, zone, subtotal);
    let total_shipping = if is_free {
        Money::zero()
    } else {
        raw_total.round_to_rupee()
    };

    Ok(ShipmentQuote {
        zone,
        base_rate,
        weight_surcharge,
        total_shipping,
        is_free,
        estimated_days: zone.delivery_days(),
    })
}

/// Free-shipping eligibility: the scope must cover the zone AND the
/// subtotal must reach the threshold.
fn free_shipping_applies(config: &ShippingConfig, zone: Zone, subtotal: Money) -> bool {
    let scope_covers_zone = match config.free_shipping_scope {
        FreeShippingScope::AllZones => true,
        FreeShippingScope::KeralaOnly => zone == Zone::Kerala,
    };

    scope_covers_zone && subtotal >= config.free_shipping_threshold
}

// =============================================================================
// Unit Tests
// =============================================================================
