//! # Order Store Boundary
//!
//! The persistence collaborator: durable storage for orders, keyed by id,
//! supporting create and payment-state-only updates. The SQLite repository
//! from monsoon-db is the production implementation;
//! [`InMemoryOrderStore`] backs tests and the demo binary.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use monsoon_core::Order;
use monsoon_db::{DbError, OrderRepository};

// =============================================================================
// Store Error
// =============================================================================

/// Failures from the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No stored order with this id.
    #[error("Order not found in store: {0}")]
    NotFound(String),

    /// An order with this id is already stored.
    #[error("Order already stored: {0}")]
    Duplicate(String),

    /// Backend failure, passed through with its message.
    #[error("Order store failure: {0}")]
    Backend(String),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id, .. } => StoreError::NotFound(id),
            DbError::UniqueViolation { field, .. } => StoreError::Duplicate(field),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

// =============================================================================
// Store Trait
// =============================================================================

/// Durable order storage.
///
/// `update_payment_state` writes only the payment-progression fields; the
/// rest of an order row is immutable after `insert`.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a newly created order with its line items.
    async fn insert(&self, order: &Order) -> Result<(), StoreError>;

    /// Persists an order's payment progression (status, timestamps,
    /// references, remainder).
    async fn update_payment_state(&self, order: &Order) -> Result<(), StoreError>;

    /// Fetches a stored order by id.
    async fn fetch(&self, id: &str) -> Result<Option<Order>, StoreError>;
}

// =============================================================================
// SQLite Implementation
// =============================================================================

#[async_trait]
impl OrderStore for OrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), StoreError> {
        OrderRepository::insert(self, order).await.map_err(Into::into)
    }

    async fn update_payment_state(&self, order: &Order) -> Result<(), StoreError> {
        OrderRepository::update_payment_state(self, order)
            .await
            .map_err(Into::into)
    }

    async fn fetch(&self, id: &str) -> Result<Option<Order>, StoreError> {
        self.get_by_id(id).await.map_err(Into::into)
    }
}

// =============================================================================
// In-Memory Implementation
// =============================================================================

/// HashMap-backed store for tests and the demo binary.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<String, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        InMemoryOrderStore::default()
    }

    /// Number of stored orders.
    pub async fn len(&self) -> usize {
        self.orders.lock().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.orders.lock().await.is_empty()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().await;
        if orders.contains_key(&order.id) {
            return Err(StoreError::Duplicate(order.id.clone()));
        }
        orders.insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn update_payment_state(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().await;
        let stored = orders
            .get_mut(&order.id)
            .ok_or_else(|| StoreError::NotFound(order.id.clone()))?;

        stored.status = order.status;
        stored.remainder_due = order.remainder_due;
        stored.advance_paid_at = order.advance_paid_at;
        stored.fully_paid_at = order.fully_paid_at;
        stored.advance_payment_ref = order.advance_payment_ref.clone();
        stored.remainder_payment_ref = order.remainder_payment_ref.clone();

        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.lock().await.get(id).cloned())
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
        CodPolicy, LineItem, Money, OrderStatus, PaymentMode, PaymentReference, ShipmentQuote,
        Weight, Zone,
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
                sku: "CASE-01".to_string(),
                name: "Phone Case".to_string(),
                unit_price: Money::from_rupees(499),
                quantity: 1,
                unit_weight: Weight::from_grams(80),
            }],
            PaymentMode::CodWithAdvance,
            quote,
            &CodPolicy::default(),
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = InMemoryOrderStore::new();
        let order = sample_order("ord-1");

        store.insert(&order).await.unwrap();
        let fetched = store.fetch("ord-1").await.unwrap().unwrap();
        assert_eq!(fetched, order);

        assert!(store.fetch("ord-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_update_touches_only_payment_state() {
        let store = InMemoryOrderStore::new();
        let mut order = sample_order("ord-1");
        store.insert(&order).await.unwrap();

        order
            .confirm_advance(PaymentReference::new("pay_1"), Utc::now())
            .unwrap();
        store.update_payment_state(&order).await.unwrap();

        let fetched = store.fetch("ord-1").await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::AdvancePaid);
        assert_eq!(fetched.grand_total, order.grand_total);
        assert_eq!(fetched.line_items, order.line_items);
    }

    #[tokio::test]
    async fn test_in_memory_duplicate_and_missing() {
        let store = InMemoryOrderStore::new();
        let order = sample_order("ord-1");

        store.insert(&order).await.unwrap();
        assert!(matches!(
            store.insert(&order).await.unwrap_err(),
            StoreError::Duplicate(_)
        ));

        let unknown = sample_order("ord-2");
        assert!(matches!(
            store.update_payment_state(&unknown).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }
}
