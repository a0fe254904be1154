//! # Domain Types
//!
//! Core domain types for shipping rates and COD orders.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ShippingConfig  │   │  ShipmentQuote  │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  base_rate      │   │  zone           │   │  id (UUID)      │       │
//! │  │  per_kg_rate    │──►│  total_shipping │──►│  quote snapshot │       │
//! │  │  zone_overrides │   │  is_free        │   │  advance_due    │       │
//! │  │  threshold      │   │  estimated_days │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Zone       │   │   OrderStatus   │   │  PaymentMode    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Kerala         │   │  Created        │   │  PayInFull      │       │
//! │  │  RestOfIndia    │   │  AdvancePaid    │   │  CodWithAdvance │       │
//! │  │  International  │   │  FullyPaid      │   └─────────────────┘       │
//! │  └─────────────────┘   │  Cancelled      │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An `Order` freezes its `ShipmentQuote` and line-item prices at creation
//! time. Later config changes never touch an issued order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Weight};

// =============================================================================
// Zone
// =============================================================================

/// Destination zone, resolved from the delivery postal code.
///
/// Selects the base shipping rate and the delivery estimate. The store ships
/// from Kerala, so in-state deliveries are the fast, cheap tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// In-state delivery (PIN prefixes 670-695).
    Kerala,
    /// Domestic delivery outside Kerala.
    RestOfIndia,
    /// Everything with a recognizably foreign postal code.
    International,
}

impl Zone {
    /// Static delivery estimate in days for this zone.
    ///
    /// A lookup, not a computation: the courier SLAs are flat per zone.
    pub const fn delivery_days(&self) -> u32 {
        match self {
            Zone::Kerala => 2,
            Zone::RestOfIndia => 5,
            Zone::International => 10,
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Zone::Kerala => "Kerala",
            Zone::RestOfIndia => "Rest of India",
            Zone::International => "International",
        };
        write!(f, "{label}")
    }
}

// =============================================================================
// Shipping Configuration
// =============================================================================

/// Which zones the free-shipping threshold applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FreeShippingScope {
    /// Threshold waives shipping everywhere.
    AllZones,
    /// Threshold waives shipping for in-state orders only.
    KeralaOnly,
}

impl Default for FreeShippingScope {
    fn default() -> Self {
        FreeShippingScope::KeralaOnly
    }
}

/// Per-zone rate override.
///
/// Only the base rate can be overridden per zone; the per-kg rate and the
/// free-shipping rule are global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ZoneRates {
    /// Base rate for this zone, replacing the global `base_rate`.
    pub base_rate: Money,
}

/// The process-wide shipping configuration.
///
/// Admin-editable and versioned by `updated_at`. Replaced atomically as a
/// whole record; readers never observe a partial update (see the settings
/// hub in monsoon-checkout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingConfig {
    /// Default flat rate when a zone has no override.
    pub base_rate: Money,

    /// Charge per kilogram beyond the included first kilogram.
    pub per_kg_rate: Money,

    /// Minimum order subtotal to waive shipping.
    pub free_shipping_threshold: Money,

    /// Which zones the waiver applies to.
    pub free_shipping_scope: FreeShippingScope,

    /// Per-zone base-rate overrides. Absent zones fall back to `base_rate`.
    pub zone_overrides: HashMap<Zone, ZoneRates>,

    /// When this record was last written.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ShippingConfig {
    /// The store's standard rate card.
    ///
    /// ## Default Values
    /// - Base: ₹50, per-kg: ₹20, free over ₹500 (Kerala only)
    /// - Overrides: Kerala ₹50, Rest of India ₹100, International ₹300
    ///
    /// The timestamp is passed in: this crate never reads the clock.
    pub fn standard_rates(updated_at: DateTime<Utc>) -> Self {
        let mut zone_overrides = HashMap::new();
        zone_overrides.insert(Zone::Kerala, ZoneRates { base_rate: Money::from_rupees(50) });
        zone_overrides.insert(Zone::RestOfIndia, ZoneRates { base_rate: Money::from_rupees(100) });
        zone_overrides.insert(Zone::International, ZoneRates { base_rate: Money::from_rupees(300) });

        ShippingConfig {
            base_rate: Money::from_rupees(50),
            per_kg_rate: Money::from_rupees(20),
            free_shipping_threshold: Money::from_rupees(500),
            free_shipping_scope: FreeShippingScope::KeralaOnly,
            zone_overrides,
            updated_at,
        }
    }

    /// Base rate for a zone: the override if present, the global default
    /// otherwise. A missing override degrades, it never errors.
    pub fn base_rate_for(&self, zone: Zone) -> Money {
        self.zone_overrides
            .get(&zone)
            .map(|rates| rates.base_rate)
            .unwrap_or(self.base_rate)
    }
}

// =============================================================================
// Shipment Quote
// =============================================================================

/// An immutable snapshot of computed shipping cost and eligibility.
///
/// Derived, never edited: recomputed on demand while the customer is typing,
/// then frozen onto the order at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShipmentQuote {
    /// Resolved destination zone.
    pub zone: Zone,
    /// Base rate applied (after zone override resolution).
    pub base_rate: Money,
    /// Weight surcharge beyond the first kilogram.
    pub weight_surcharge: Money,
    /// Final shipping charge (0 when `is_free`).
    pub total_shipping: Money,
    /// Whether free-shipping eligibility zeroed the charge.
    pub is_free: bool,
    /// Static delivery estimate for the zone.
    pub estimated_days: u32,
}

// =============================================================================
// COD Policy
// =============================================================================

/// Cash-on-delivery policy constants, admin-editable.
///
/// The advance fraction is stored in basis points (1000 = 10%), the same
/// integer representation used everywhere money is scaled. The writer clamps
/// the fraction into [0, 10000]; the lifecycle trusts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CodPolicy {
    /// Master switch: COD order creation fails when disabled.
    pub enabled: bool,

    /// Floor for the advance amount.
    pub minimum_advance: Money,

    /// Advance as a fraction of the grand total, in basis points.
    pub advance_fraction_bps: u32,

    /// Zones where COD is offered.
    pub allowed_zones: Vec<Zone>,
}

impl Default for CodPolicy {
    /// COD on, ₹50 floor, 10% advance, domestic zones only.
    fn default() -> Self {
        CodPolicy {
            enabled: true,
            minimum_advance: Money::from_rupees(50),
            advance_fraction_bps: 1000,
            allowed_zones: vec![Zone::Kerala, Zone::RestOfIndia],
        }
    }
}

impl CodPolicy {
    /// Whether COD is offered for the given zone under this policy.
    pub fn allows_zone(&self, zone: Zone) -> bool {
        self.enabled && self.allowed_zones.contains(&zone)
    }
}

// =============================================================================
// Payment Method Toggles
// =============================================================================

/// Which online payment methods the storefront offers.
///
/// Informational to the checkout surface; the order lifecycle does not
/// consult these. Broadcast on change like the shipping config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentMethodToggles {
    pub upi: bool,
    pub card: bool,
    pub net_banking: bool,
}

impl Default for PaymentMethodToggles {
    fn default() -> Self {
        PaymentMethodToggles { upi: true, card: true, net_banking: true }
    }
}

// =============================================================================
// Payment Mode & Status
// =============================================================================

/// How the customer chose to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Full amount collected up front.
    PayInFull,
    /// Advance collected now, remainder collected at delivery.
    CodWithAdvance,
}

/// The payment-status progression of an order.
///
/// `FullyPaid` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order exists; nothing collected yet.
    Created,
    /// Advance captured; remainder outstanding (COD only).
    AdvancePaid,
    /// Everything collected.
    FullyPaid,
    /// Abandoned before completion.
    Cancelled,
}

impl OrderStatus {
    /// Terminal states accept no further transitions.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::FullyPaid | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Created
    }
}

// =============================================================================
// Payment Reference
// =============================================================================

/// Opaque reference returned by the payment gateway for a successful capture.
///
/// The lifecycle records it verbatim; only the gateway can interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    pub fn new(reference: impl Into<String>) -> Self {
        PaymentReference(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A line in an order.
/// Uses snapshot pattern: price, name, and weight are frozen at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Stock Keeping Unit - business identifier.
    pub sku: String,
    /// Product name at time of ordering (frozen).
    pub name: String,
    /// Unit price at time of ordering (frozen).
    pub unit_price: Money,
    /// Quantity ordered.
    pub quantity: i64,
    /// Per-unit weight at time of ordering (frozen).
    pub unit_weight: Weight,
}

impl LineItem {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Line weight (unit weight × quantity).
    #[inline]
    pub fn line_weight(&self) -> Weight {
        self.unit_weight.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A purchase tracked from creation through payment to completion.
///
/// Immutable after creation except for `status`, the payment timestamps and
/// references, and the remainder zeroing on final payment - and those only
/// through the lifecycle transitions in [`crate::lifecycle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// What was bought, with prices and weights frozen at order time.
    pub line_items: Vec<LineItem>,

    /// Sum of line totals, computed at creation.
    pub subtotal: Money,

    /// Sum of line weights, computed at creation.
    pub total_weight: Weight,

    /// Shipping quote snapshot taken at creation. Never recomputed, even if
    /// the config changes later - price integrity.
    pub quote: ShipmentQuote,

    /// `subtotal + quote.total_shipping`.
    pub grand_total: Money,

    /// How the customer chose to pay.
    pub payment_mode: PaymentMode,

    /// Amount collected up front.
    pub advance_due: Money,

    /// Amount collected at delivery (0 for `PayInFull`).
    pub remainder_due: Money,

    /// Where the order is in its payment progression.
    pub status: OrderStatus,

    /// When the order was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the advance was captured.
    #[ts(as = "Option<String>")]
    pub advance_paid_at: Option<DateTime<Utc>>,

    /// When the final payment landed.
    #[ts(as = "Option<String>")]
    pub fully_paid_at: Option<DateTime<Utc>>,

    /// Gateway reference for the advance capture.
    pub advance_payment_ref: Option<PaymentReference>,

    /// Gateway reference for the remainder capture (COD only).
    pub remainder_payment_ref: Option<PaymentReference>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_days_are_ordered() {
        assert!(Zone::Kerala.delivery_days() < Zone::RestOfIndia.delivery_days());
        assert!(Zone::RestOfIndia.delivery_days() < Zone::International.delivery_days());
    }

    #[test]
    fn test_base_rate_for_falls_back() {
        let mut config = ShippingConfig::standard_rates(Utc::now());
        assert_eq!(config.base_rate_for(Zone::RestOfIndia), Money::from_rupees(100));

        config.zone_overrides.remove(&Zone::RestOfIndia);
        assert_eq!(config.base_rate_for(Zone::RestOfIndia), Money::from_rupees(50));
    }

    #[test]
    fn test_cod_policy_zone_gate() {
        let policy = CodPolicy::default();
        assert!(policy.allows_zone(Zone::Kerala));
        assert!(policy.allows_zone(Zone::RestOfIndia));
        assert!(!policy.allows_zone(Zone::International));

        let disabled = CodPolicy { enabled: false, ..CodPolicy::default() };
        assert!(!disabled.allows_zone(Zone::Kerala));
    }

    #[test]
    fn test_line_item_math() {
        let item = LineItem {
            sku: "HDPH-BT".to_string(),
            name: "Wireless Headphones".to_string(),
            unit_price: Money::from_rupees(1299),
            quantity: 2,
            unit_weight: Weight::from_grams(250),
        };
        assert_eq!(item.line_total(), Money::from_rupees(2598));
        assert_eq!(item.line_weight(), Weight::from_grams(500));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::Created.is_terminal());
        assert!(!OrderStatus::AdvancePaid.is_terminal());
        assert!(OrderStatus::FullyPaid.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_shipping_config_serde_round_trip() {
        let config = ShippingConfig::standard_rates(Utc::now());
        let json = serde_json::to_string(&config).unwrap();
        let back: ShippingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
