//! # Checkout Flow
//!
//! Wires the collaborators around the pure core:
//! quote → create → persist, then capture → confirm → persist per payment.
//!
//! ## COD Journey
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order(items, CodWithAdvance, "682001")                           │
//! │     │  quote against the live config, freeze it onto the order         │
//! │     │  store.insert() - a failed create persists nothing               │
//! │     ▼                                                                   │
//! │  pay_advance(order_id)                                                  │
//! │     │  gateway.capture(advance_due)   ← OUTSIDE the order lock         │
//! │     │  confirm_advance(reference)     ← under the per-order lock       │
//! │     │  store.update_payment_state()                                    │
//! │     ▼                                                                   │
//! │  pay_remainder(order_id)              (at delivery)                     │
//! │     │  gateway.capture(remainder_due)                                  │
//! │     │  confirm_remainder(reference)                                    │
//! │     │  store.update_payment_state()                                    │
//! │     ▼                                                                   │
//! │  FullyPaid                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Capture failures surface as [`CaptureError`](crate::error::CaptureError)
//! and leave the order exactly where it was; retrying is the caller's call.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::CheckoutError;
use crate::gateway::{CaptureMetadata, CapturePurpose, PaymentGateway};
use crate::ledger::OrderLedger;
use crate::settings::SettingsHub;
use crate::store::OrderStore;
use monsoon_core::rate::quote_shipment;
use monsoon_core::{
    CoreError, CoreResult, LineItem, Money, Order, OrderStatus, PaymentMode, ShipmentQuote,
    Weight, CURRENCY,
};

/// The checkout orchestrator.
///
/// Generic over the two external collaborators so tests and the demo run
/// against the mock gateway and the in-memory store while production wires
/// the real gateway client and the SQLite repository.
pub struct CheckoutFlow<G, S> {
    settings: Arc<SettingsHub>,
    ledger: OrderLedger,
    gateway: G,
    store: S,
}

impl<G: PaymentGateway, S: OrderStore> CheckoutFlow<G, S> {
    /// Creates a flow around already-constructed collaborators.
    pub fn new(settings: Arc<SettingsHub>, gateway: G, store: S) -> Self {
        CheckoutFlow {
            settings,
            ledger: OrderLedger::new(),
            gateway,
            store,
        }
    }

    /// The settings hub this flow quotes against.
    pub fn settings(&self) -> &Arc<SettingsHub> {
        &self.settings
    }

    /// Quotes a shipment against the current configuration, immediately.
    ///
    /// The storefront's as-you-type path goes through the debounced
    /// [`Quoter`](crate::quoter::Quoter) instead; this entry point serves
    /// order placement and admin previews.
    pub fn quote(
        &self,
        postal_code: &str,
        subtotal: Money,
        total_weight: Weight,
    ) -> CoreResult<ShipmentQuote> {
        quote_shipment(
            &self.settings.shipping_config(),
            postal_code,
            subtotal,
            total_weight,
        )
    }

    /// Quotes the cart, creates the order with the frozen quote, and
    /// persists it.
    ///
    /// Any failure - malformed postal code, bad line item, COD not offered,
    /// storage error - yields no order at all.
    pub async fn place_order(
        &self,
        line_items: Vec<LineItem>,
        payment_mode: PaymentMode,
        postal_code: &str,
    ) -> Result<Order, CheckoutError> {
        let subtotal = line_items
            .iter()
            .fold(Money::zero(), |sum, item| sum + item.line_total());
        let total_weight = line_items
            .iter()
            .fold(Weight::zero(), |sum, item| sum + item.line_weight());

        let quote = self.quote(postal_code, subtotal, total_weight)?;
        let policy = self.settings.cod_policy();

        let order = Order::create(
            Uuid::new_v4().to_string(),
            line_items,
            payment_mode,
            quote,
            &policy,
            Utc::now(),
        )?;

        self.store.insert(&order).await?;
        self.ledger.insert(order.clone()).await?;

        info!(
            order_id = %order.id,
            mode = ?order.payment_mode,
            grand_total = %order.grand_total,
            advance_due = %order.advance_due,
            "Order placed"
        );
        Ok(order)
    }

    /// Re-tracks an order loaded from storage (process restart).
    ///
    /// Load-at-boundary: the caller reads storage once and hands the order
    /// in; the flow itself never goes looking.
    pub async fn restore(&self, order: Order) -> Result<(), CheckoutError> {
        self.ledger.insert(order).await
    }

    /// A snapshot of a tracked order.
    pub async fn order(&self, order_id: &str) -> Option<Order> {
        self.ledger.get(order_id).await
    }

    /// Captures the advance and confirms it on the order.
    ///
    /// The capture happens outside the order lock (no blocking I/O inside a
    /// transition); confirmation is serialized per order, so of two racing
    /// payments exactly one transition lands and the other reports
    /// `IllegalTransition` with the advanced status. Reconciling a capture
    /// whose confirmation lost that race is between the caller and the
    /// gateway.
    pub async fn pay_advance(&self, order_id: &str) -> Result<Order, CheckoutError> {
        let order = self
            .ledger
            .get(order_id)
            .await
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;

        // Cheap pre-check so an obviously settled order never reaches the
        // gateway. The authoritative check is the transition below.
        if order.status != OrderStatus::Created {
            return Err(illegal(&order, "confirm advance").into());
        }

        let reference = self
            .gateway
            .capture(
                order.advance_due,
                CURRENCY,
                CaptureMetadata {
                    order_id: order.id.clone(),
                    purpose: CapturePurpose::Advance,
                },
            )
            .await?;

        let updated = self
            .ledger
            .with_order_mut(order_id, |order| {
                order
                    .confirm_advance(reference, Utc::now())
                    .map(|_| order.clone())
            })
            .await??;

        self.store.update_payment_state(&updated).await?;

        info!(
            order_id = %updated.id,
            status = ?updated.status,
            remainder_due = %updated.remainder_due,
            "Advance captured"
        );
        Ok(updated)
    }

    /// Captures the COD remainder at delivery and completes the order.
    pub async fn pay_remainder(&self, order_id: &str) -> Result<Order, CheckoutError> {
        let order = self
            .ledger
            .get(order_id)
            .await
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;

        if order.status != OrderStatus::AdvancePaid {
            return Err(illegal(&order, "confirm remainder").into());
        }

        let reference = self
            .gateway
            .capture(
                order.remainder_due,
                CURRENCY,
                CaptureMetadata {
                    order_id: order.id.clone(),
                    purpose: CapturePurpose::Remainder,
                },
            )
            .await?;

        let updated = self
            .ledger
            .with_order_mut(order_id, |order| {
                order
                    .confirm_remainder(reference, Utc::now())
                    .map(|_| order.clone())
            })
            .await??;

        self.store.update_payment_state(&updated).await?;

        info!(order_id = %updated.id, "Remainder captured, order fully paid");
        Ok(updated)
    }

    /// Cancels an order.
    ///
    /// Refunding an already-captured advance is between the caller and the
    /// gateway; the flow only moves the order to its terminal state.
    pub async fn cancel_order(&self, order_id: &str) -> Result<Order, CheckoutError> {
        let updated = self
            .ledger
            .with_order_mut(order_id, |order| order.cancel().map(|_| order.clone()))
            .await??;

        self.store.update_payment_state(&updated).await?;

        warn!(order_id = %updated.id, "Order cancelled");
        Ok(updated)
    }
}

fn illegal(order: &Order, action: &str) -> CoreError {
    CoreError::IllegalTransition {
        order_id: order.id.clone(),
        status: order.status,
        action: action.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;
    use crate::store::InMemoryOrderStore;
    use monsoon_core::PaymentReference;

    fn cart() -> Vec<LineItem> {
        vec![
            LineItem {
                sku: "HDPH-BT".to_string(),
                name: "Wireless Headphones".to_string(),
                unit_price: Money::from_rupees(1299),
                quantity: 1,
                unit_weight: Weight::from_grams(250),
            },
            LineItem {
                sku: "CASE-01".to_string(),
                name: "Phone Case".to_string(),
                unit_price: Money::from_rupees(499),
                quantity: 2,
                unit_weight: Weight::from_grams(80),
            },
        ]
    }

    fn flow() -> CheckoutFlow<MockGateway, InMemoryOrderStore> {
        CheckoutFlow::new(
            Arc::new(SettingsHub::default()),
            MockGateway::new(),
            InMemoryOrderStore::new(),
        )
    }

    #[tokio::test]
    async fn test_place_order_freezes_quote() {
        let flow = flow();

        // ₹2297 subtotal clears the threshold; Kerala destination → free.
        let order = flow
            .place_order(cart(), PaymentMode::PayInFull, "682001")
            .await
            .unwrap();

        assert!(order.quote.is_free);
        assert_eq!(order.grand_total, order.subtotal);
        assert_eq!(flow.store.fetch(&order.id).await.unwrap().unwrap(), order);
    }

    #[tokio::test]
    async fn test_invalid_postal_code_places_nothing() {
        let flow = flow();

        let err = flow
            .place_order(cart(), PaymentMode::PayInFull, "not a code!")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::InvalidPostalCode { .. })
        ));
        assert!(flow.store.is_empty().await);
        assert!(flow.ledger.is_empty().await);
    }

    #[tokio::test]
    async fn test_capture_failure_leaves_order_untouched() {
        let flow = flow();
        let order = flow
            .place_order(cart(), PaymentMode::CodWithAdvance, "682001")
            .await
            .unwrap();

        flow.gateway.fail_next();
        let err = flow.pay_advance(&order.id).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Capture(_)));

        let current = flow.order(&order.id).await.unwrap();
        assert_eq!(current.status, OrderStatus::Created);
        assert!(current.advance_payment_ref.is_none());
    }

    #[tokio::test]
    async fn test_pay_advance_on_settled_order_does_not_recapture() {
        let flow = flow();
        let order = flow
            .place_order(cart(), PaymentMode::PayInFull, "682001")
            .await
            .unwrap();

        flow.pay_advance(&order.id).await.unwrap();
        assert_eq!(flow.gateway.captures(), 1);

        let err = flow.pay_advance(&order.id).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::IllegalTransition { .. })
        ));
        // The pre-check kept the second attempt away from the gateway.
        assert_eq!(flow.gateway.captures(), 1);
    }

    #[tokio::test]
    async fn test_cancel_persists_terminal_state() {
        let flow = flow();
        let order = flow
            .place_order(cart(), PaymentMode::CodWithAdvance, "682001")
            .await
            .unwrap();

        flow.cancel_order(&order.id).await.unwrap();

        let stored = flow.store.fetch(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Cancelled);

        let err = flow.pay_advance(&order.id).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::IllegalTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_restore_tracks_loaded_order() {
        let original = flow();
        let order = original
            .place_order(cart(), PaymentMode::CodWithAdvance, "682001")
            .await
            .unwrap();
        let mut loaded = original.store.fetch(&order.id).await.unwrap().unwrap();
        loaded
            .confirm_advance(PaymentReference::new("pay_prior"), Utc::now())
            .unwrap();

        // A fresh flow, as after a restart: hydrate from storage.
        let restarted = flow();
        restarted.restore(loaded.clone()).await.unwrap();

        let seen = restarted.order(&order.id).await.unwrap();
        assert_eq!(seen.status, OrderStatus::AdvancePaid);
    }
}
