//! # monsoon-core: Pure Business Logic for Monsoon
//!
//! This crate is the **heart** of Monsoon. It contains the shipping-rate
//! engine and the COD order lifecycle as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Monsoon Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Storefront (JS, external)                     │   │
//! │  │    Cart UI ──► Shipping estimate ──► Checkout ──► Order status  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 monsoon-checkout (orchestration)                │   │
//! │  │    settings hub, debounced quoter, order ledger, capture flow   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ monsoon-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   zone    │  │   rate    │  │ lifecycle │  │   │
//! │  │   │   Money   │  │  Zone     │  │  quote_   │  │  Order    │  │   │
//! │  │   │   Weight  │  │  classify │  │  shipment │  │  create/  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  │  confirm  │  │   │
//! │  │                                                 └───────────┘  │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO CLOCK • PURE          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  monsoon-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ShippingConfig, ShipmentQuote, Order, ...)
//! - [`money`] - Money (integer paise) and Weight (integer grams)
//! - [`zone`] - Postal-code classification into delivery zones
//! - [`rate`] - The shipping rate engine
//! - [`lifecycle`] - Order creation and payment-status transitions
//! - [`error`] - Domain error types
//! - [`validation`] - Input and admin-record validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input =
//!    same output. Callers pass timestamps and ids in.
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64), weights in
//!    grams (i64), to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use monsoon_core::money::{Money, Weight};
//! use monsoon_core::rate::quote_shipment;
//! use monsoon_core::types::ShippingConfig;
//!
//! let config = ShippingConfig::standard_rates(Utc::now());
//!
//! // A 1.5 kg cart worth ₹600 going to Kochi ships free: the subtotal
//! // clears the ₹500 threshold and Kerala is inside the waiver scope.
//! let quote = quote_shipment(&config, "682001", Money::from_rupees(600), Weight::from_kg(1.5))
//!     .unwrap();
//! assert!(quote.is_free);
//! assert_eq!(quote.total_shipping, Money::zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod money;
pub mod rate;
pub mod types;
pub mod validation;
pub mod zone;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use monsoon_core::Money` instead of
// `use monsoon_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Weight};
pub use rate::quote_shipment;
pub use types::*;
pub use zone::classify_postal_code;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// ISO 4217 code for every amount in the system.
///
/// ## Why a constant?
/// The store sells in a single currency. The payment gateway still wants the
/// code spelled out on every capture, so it lives here rather than being
/// retyped at call sites.
pub const CURRENCY: &str = "INR";

/// Maximum line items allowed in a single order.
///
/// ## Business Reason
/// Prevents runaway carts and keeps order documents a sane size.
pub const MAX_ORDER_LINES: usize = 100;
