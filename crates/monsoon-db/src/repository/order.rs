//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Write Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Persistence                                 │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── insert() → order row + item rows in ONE transaction            │
//! │         (a failed create persists nothing, never a half order)         │
//! │                                                                         │
//! │  2. PAYMENT PROGRESSION                                                │
//! │     └── update_payment_state() → status, timestamps, gateway refs,     │
//! │         remainder only. Line items and the quote snapshot are          │
//! │         immutable after creation.                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{Row, SqlitePool};
use sqlx::sqlite::SqliteRow;
use tracing::debug;

use crate::error::{DbError, DbResult};
use monsoon_core::{
    LineItem, Money, Order, OrderStatus, PaymentMode, PaymentReference, ShipmentQuote, Weight,
    Zone,
};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts a complete order with its line items in one transaction.
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, status = ?order.status, "Inserting order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, payment_mode, status,
                subtotal_paise, total_weight_grams,
                quote_zone, quote_base_rate_paise, quote_weight_surcharge_paise,
                quote_total_shipping_paise, quote_is_free, quote_estimated_days,
                grand_total_paise, advance_due_paise, remainder_due_paise,
                advance_payment_ref, remainder_payment_ref,
                created_at, advance_paid_at, fully_paid_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5,
                ?6, ?7, ?8,
                ?9, ?10, ?11,
                ?12, ?13, ?14,
                ?15, ?16,
                ?17, ?18, ?19
            )
            "#,
        )
        .bind(&order.id)
        .bind(order.payment_mode)
        .bind(order.status)
        .bind(order.subtotal.paise())
        .bind(order.total_weight.grams())
        .bind(order.quote.zone)
        .bind(order.quote.base_rate.paise())
        .bind(order.quote.weight_surcharge.paise())
        .bind(order.quote.total_shipping.paise())
        .bind(order.quote.is_free)
        .bind(order.quote.estimated_days as i64)
        .bind(order.grand_total.paise())
        .bind(order.advance_due.paise())
        .bind(order.remainder_due.paise())
        .bind(order.advance_payment_ref.as_ref().map(|r| r.as_str()))
        .bind(order.remainder_payment_ref.as_ref().map(|r| r.as_str()))
        .bind(order.created_at)
        .bind(order.advance_paid_at)
        .bind(order.fully_paid_at)
        .execute(&mut *tx)
        .await?;

        for (line_no, item) in order.line_items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    order_id, line_no, sku, name,
                    unit_price_paise, quantity, unit_weight_grams
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&order.id)
            .bind(line_no as i64)
            .bind(&item.sku)
            .bind(&item.name)
            .bind(item.unit_price.paise())
            .bind(item.quantity)
            .bind(item.unit_weight.grams())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Writes the payment-progression fields of an order.
    ///
    /// Only status, timestamps, gateway references, and the remainder are
    /// touched; everything else is an immutable snapshot.
    pub async fn update_payment_state(&self, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, status = ?order.status, "Updating order payment state");

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = ?1,
                remainder_due_paise = ?2,
                advance_payment_ref = ?3,
                remainder_payment_ref = ?4,
                advance_paid_at = ?5,
                fully_paid_at = ?6
            WHERE id = ?7
            "#,
        )
        .bind(order.status)
        .bind(order.remainder_due.paise())
        .bind(order.advance_payment_ref.as_ref().map(|r| r.as_str()))
        .bind(order.remainder_payment_ref.as_ref().map(|r| r.as_str()))
        .bind(order.advance_paid_at)
        .bind(order.fully_paid_at)
        .bind(&order.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", &order.id));
        }

        Ok(())
    }

    /// Gets an order by ID, with its line items in order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.fetch_items(id).await?;
        Ok(Some(order_from_row(&row, items)?))
    }

    /// Lists orders in a given status, oldest first.
    ///
    /// Used by the fulfilment side, e.g. COD orders waiting on their
    /// delivery payment.
    pub async fn list_by_status(&self, status: OrderStatus) -> DbResult<Vec<Order>> {
        let rows = sqlx::query("SELECT * FROM orders WHERE status = ?1 ORDER BY created_at")
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id")?;
            let items = self.fetch_items(&id).await?;
            orders.push(order_from_row(&row, items)?);
        }

        Ok(orders)
    }

    async fn fetch_items(&self, order_id: &str) -> DbResult<Vec<LineItem>> {
        let rows = sqlx::query(
            r#"
            SELECT sku, name, unit_price_paise, quantity, unit_weight_grams
            FROM order_items
            WHERE order_id = ?1
            ORDER BY line_no
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(LineItem {
                    sku: row.try_get("sku")?,
                    name: row.try_get("name")?,
                    unit_price: Money::from_paise(row.try_get("unit_price_paise")?),
                    quantity: row.try_get("quantity")?,
                    unit_weight: Weight::from_grams(row.try_get("unit_weight_grams")?),
                })
            })
            .collect()
    }
}

/// Rebuilds an [`Order`] from its row plus its line items.
fn order_from_row(row: &SqliteRow, line_items: Vec<LineItem>) -> DbResult<Order> {
    let quote = ShipmentQuote {
        zone: row.try_get::<Zone, _>("quote_zone")?,
        base_rate: Money::from_paise(row.try_get("quote_base_rate_paise")?),
        weight_surcharge: Money::from_paise(row.try_get("quote_weight_surcharge_paise")?),
        total_shipping: Money::from_paise(row.try_get("quote_total_shipping_paise")?),
        is_free: row.try_get("quote_is_free")?,
        estimated_days: row.try_get::<i64, _>("quote_estimated_days")? as u32,
    };

    Ok(Order {
        id: row.try_get("id")?,
        line_items,
        subtotal: Money::from_paise(row.try_get("subtotal_paise")?),
        total_weight: Weight::from_grams(row.try_get("total_weight_grams")?),
        quote,
        grand_total: Money::from_paise(row.try_get("grand_total_paise")?),
        payment_mode: row.try_get::<PaymentMode, _>("payment_mode")?,
        advance_due: Money::from_paise(row.try_get("advance_due_paise")?),
        remainder_due: Money::from_paise(row.try_get("remainder_due_paise")?),
        status: row.try_get::<OrderStatus, _>("status")?,
        created_at: row.try_get("created_at")?,
        advance_paid_at: row.try_get("advance_paid_at")?,
        fully_paid_at: row.try_get("fully_paid_at")?,
        advance_payment_ref: row
            .try_get::<Option<String>, _>("advance_payment_ref")?
            .map(PaymentReference::new),
        remainder_payment_ref: row
            .try_get::<Option<String>, _>("remainder_payment_ref")?
            .map(PaymentReference::new),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
