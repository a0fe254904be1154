//! # Live Settings Hub
//!
//! Process-wide admin settings with atomic replace-and-notify.
//!
//! ## Update Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Settings Update Protocol                            │
//! │                                                                         │
//! │  Admin write                         Quote traffic                      │
//! │  ───────────                         ─────────────                      │
//! │  1. Build a fully-populated          current() → Arc<ShippingConfig>   │
//! │     replacement record                  (never blocks on a write;      │
//! │  2. Validate the WHOLE record            always a whole record)        │
//! │  3. send_replace() → atomic swap                                       │
//! │  4. watch channel wakes every        subscribe() → watch::Receiver     │
//! │     subscriber (push, not polling)      (quoter requotes on change)    │
//! │                                                                         │
//! │  A rejected write leaves the live record untouched. Readers can        │
//! │  never observe a partially-applied update.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orders snapshot their quote at creation; a swap never reaches back into
//! an issued order.
//!
//! ## Load At Boundary
//! The hub is constructed from already-loaded records (the db settings
//! repository, or defaults on first boot). It does not read storage itself;
//! persisting an accepted write is the admin surface's follow-up call.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::error::ConfigError;
use monsoon_core::validation::{validate_cod_policy, validate_shipping_config};
use monsoon_core::{CodPolicy, PaymentMethodToggles, ShippingConfig};

/// Live, process-wide settings records.
///
/// Cheap to share behind an `Arc`; every accessor takes `&self`.
#[derive(Debug)]
pub struct SettingsHub {
    shipping: watch::Sender<Arc<ShippingConfig>>,
    cod: watch::Sender<Arc<CodPolicy>>,
    methods: watch::Sender<Arc<PaymentMethodToggles>>,
}

impl SettingsHub {
    /// Creates a hub from already-loaded records.
    pub fn new(
        shipping: ShippingConfig,
        cod: CodPolicy,
        methods: PaymentMethodToggles,
    ) -> Self {
        let (shipping_tx, _) = watch::channel(Arc::new(shipping));
        let (cod_tx, _) = watch::channel(Arc::new(cod));
        let (methods_tx, _) = watch::channel(Arc::new(methods));

        SettingsHub {
            shipping: shipping_tx,
            cod: cod_tx,
            methods: methods_tx,
        }
    }

    // -------------------------------------------------------------------------
    // Shipping configuration
    // -------------------------------------------------------------------------

    /// The current shipping configuration, as one consistent record.
    pub fn shipping_config(&self) -> Arc<ShippingConfig> {
        self.shipping.borrow().clone()
    }

    /// Subscribes to shipping configuration swaps.
    pub fn subscribe_shipping(&self) -> watch::Receiver<Arc<ShippingConfig>> {
        self.shipping.subscribe()
    }

    /// Validates and swaps in a replacement shipping configuration.
    ///
    /// ## Errors
    /// `ConfigError::Rejected` when any field is invalid; the live record
    /// is left untouched.
    pub fn update_shipping_config(&self, config: ShippingConfig) -> Result<(), ConfigError> {
        validate_shipping_config(&config)?;

        info!(updated_at = %config.updated_at, "Swapping shipping configuration");
        self.shipping.send_replace(Arc::new(config));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // COD policy
    // -------------------------------------------------------------------------

    /// The current COD policy, as one consistent record.
    pub fn cod_policy(&self) -> Arc<CodPolicy> {
        self.cod.borrow().clone()
    }

    /// Subscribes to COD policy swaps.
    pub fn subscribe_cod(&self) -> watch::Receiver<Arc<CodPolicy>> {
        self.cod.subscribe()
    }

    /// Validates and swaps in a replacement COD policy.
    pub fn update_cod_policy(&self, policy: CodPolicy) -> Result<(), ConfigError> {
        validate_cod_policy(&policy)?;

        info!(
            enabled = policy.enabled,
            advance_fraction_bps = policy.advance_fraction_bps,
            "Swapping COD policy"
        );
        self.cod.send_replace(Arc::new(policy));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Payment method toggles
    // -------------------------------------------------------------------------

    /// The current payment-method toggles.
    pub fn payment_methods(&self) -> Arc<PaymentMethodToggles> {
        self.methods.borrow().clone()
    }

    /// Subscribes to payment-method toggle swaps.
    pub fn subscribe_payment_methods(&self) -> watch::Receiver<Arc<PaymentMethodToggles>> {
        self.methods.subscribe()
    }

    /// Swaps in replacement payment-method toggles.
    ///
    /// Toggles are plain booleans; there is nothing to validate.
    pub fn update_payment_methods(&self, methods: PaymentMethodToggles) {
        info!(
            upi = methods.upi,
            card = methods.card,
            net_banking = methods.net_banking,
            "Swapping payment method toggles"
        );
        self.methods.send_replace(Arc::new(methods));
    }
}

impl Default for SettingsHub {
    /// A hub seeded with the standard rate card and default policies.
    fn default() -> Self {
        SettingsHub::new(
            ShippingConfig::standard_rates(chrono::Utc::now()),
            CodPolicy::default(),
            PaymentMethodToggles::default(),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
