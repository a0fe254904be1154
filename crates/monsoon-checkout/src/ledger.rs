//! # Order Ledger
//!
//! In-memory order tracking with per-order transition serialization.
//!
//! ## Single Logical Owner
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Per-Order Locking                                    │
//! │                                                                         │
//! │  ledger map (outer Mutex, held only to look up the entry)              │
//! │    ├── "ord-a" → Arc<Mutex<Order>>  ◄── transition A1 ── transition A2 │
//! │    └── "ord-b" → Arc<Mutex<Order>>  ◄── transition B1                  │
//! │                                                                         │
//! │  A1 and A2 against the same order serialize on the entry lock: the     │
//! │  loser runs against the updated status and fails IllegalTransition     │
//! │  instead of corrupting the order. B1 proceeds untouched - orders       │
//! │  never contend with each other.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::CheckoutError;
use monsoon_core::Order;

/// Tracks live orders and serializes transitions per order id.
#[derive(Debug, Default)]
pub struct OrderLedger {
    orders: Mutex<HashMap<String, Arc<Mutex<Order>>>>,
}

impl OrderLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        OrderLedger::default()
    }

    /// Starts tracking a new order.
    ///
    /// ## Errors
    /// `DuplicateOrder` if the id is already tracked.
    pub async fn insert(&self, order: Order) -> Result<(), CheckoutError> {
        let mut orders = self.orders.lock().await;
        if orders.contains_key(&order.id) {
            return Err(CheckoutError::DuplicateOrder(order.id));
        }
        orders.insert(order.id.clone(), Arc::new(Mutex::new(order)));
        Ok(())
    }

    /// Returns a snapshot of an order's current state.
    pub async fn get(&self, id: &str) -> Option<Order> {
        let entry = self.entry(id).await?;
        let order = entry.lock().await;
        Some(order.clone())
    }

    /// Runs a closure against an order under its entry lock.
    ///
    /// This is the serialization point for lifecycle transitions: at most
    /// one closure runs per order at a time, and each sees the state the
    /// previous one left behind. The outer map lock is released before the
    /// entry lock is taken, so other orders are never blocked.
    pub async fn with_order_mut<F, R>(&self, id: &str, f: F) -> Result<R, CheckoutError>
    where
        F: FnOnce(&mut Order) -> R,
    {
        let entry = self
            .entry(id)
            .await
            .ok_or_else(|| CheckoutError::OrderNotFound(id.to_string()))?;

        let mut order = entry.lock().await;
        Ok(f(&mut order))
    }

    /// Number of tracked orders.
    pub async fn len(&self) -> usize {
        self.orders.lock().await.len()
    }

    /// Whether the ledger is empty.
    pub async fn is_empty(&self) -> bool {
        self.orders.lock().await.is_empty()
    }

    async fn entry(&self, id: &str) -> Option<Arc<Mutex<Order>>> {
        self.orders.lock().await.get(id).cloned()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use monsoon_core::{
        CodPolicy, LineItem, Money, Order, OrderStatus, PaymentMode, PaymentReference,
        ShipmentQuote, Weight, Zone,
    };

    fn sample_order(id: &str) -> Order {
        let quote = ShipmentQuote {
            zone: Zone::Kerala,
            base_rate: Money::from_rupees(50),
            weight_surcharge: Money::zero(),
            total_shipping: Money::from_rupees(50),
            is_free: false,
            estimated_days: 2,
        };
        Order::create(
            id,
            vec![LineItem {
                sku: "HDPH-BT".to_string(),
                name: "Wireless Headphones".to_string(),
                unit_price: Money::from_rupees(1299),
                quantity: 1,
                unit_weight: Weight::from_grams(250),
            }],
            PaymentMode::CodWithAdvance,
            quote,
            &CodPolicy::default(),
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let ledger = OrderLedger::new();
        ledger.insert(sample_order("ord-1")).await.unwrap();

        let order = ledger.get("ord-1").await.unwrap();
        assert_eq!(order.status, OrderStatus::Created);
        assert!(ledger.get("ord-2").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let ledger = OrderLedger::new();
        ledger.insert(sample_order("ord-1")).await.unwrap();

        let err = ledger.insert(sample_order("ord-1")).await.unwrap_err();
        assert!(matches!(err, CheckoutError::DuplicateOrder(_)));
    }

    #[tokio::test]
    async fn test_transitions_serialize_per_order() {
        let ledger = Arc::new(OrderLedger::new());
        ledger.insert(sample_order("ord-1")).await.unwrap();

        // Two confirmations race; the entry lock serializes them, so
        // exactly one succeeds and the other observes AdvancePaid.
        let confirm = |ledger: Arc<OrderLedger>| async move {
            ledger
                .with_order_mut("ord-1", |order| {
                    order.confirm_advance(PaymentReference::new("pay_race"), Utc::now())
                })
                .await
                .unwrap()
        };

        let (a, b) = tokio::join!(confirm(ledger.clone()), confirm(ledger.clone()));
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);

        let order = ledger.get("ord-1").await.unwrap();
        assert_eq!(order.status, OrderStatus::AdvancePaid);
        assert!(order.advance_paid_at.is_some());
    }

    #[tokio::test]
    async fn test_with_order_mut_unknown_id() {
        let ledger = OrderLedger::new();
        let err = ledger
            .with_order_mut("nope", |_| ())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::OrderNotFound(_)));
    }
}
