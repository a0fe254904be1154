//! # Order Lifecycle
//!
//! Creation and payment-status progression of an [`Order`].
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Status Progression                           │
//! │                                                                         │
//! │              confirm_advance            confirm_remainder               │
//! │   Created ───────────────────► AdvancePaid ──────────────► FullyPaid   │
//! │      │                             │                          ▲         │
//! │      │                             │                          │         │
//! │      │   (nothing left to collect: PayInFull, or a COD        │         │
//! │      │    advance that already covers the grand total) ───────┘         │
//! │      │                             │                                    │
//! │      │ cancel                      │ cancel                             │
//! │      ▼                             ▼                                    │
//! │   Cancelled ◄──────────────────────┘                                    │
//! │                                                                         │
//! │   FullyPaid and Cancelled are terminal: every transition from them     │
//! │   fails with IllegalTransition.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transitions are total functions over (current status, requested action):
//! an invalid combination always fails with a named error carrying the
//! actual status, never a silent no-op, so a client can distinguish
//! "already done" from "wrong order".
//!
//! The caller passes timestamps in; this module never reads the clock.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Weight};
use crate::types::{
    CodPolicy, LineItem, Order, OrderStatus, PaymentMode, PaymentReference, ShipmentQuote,
};
use crate::validation::validate_line_item;

impl Order {
    /// Creates a new order from a cart, a payment mode, and a quote snapshot.
    ///
    /// ## Amount Split
    /// - `PayInFull`: the whole grand total is due up front.
    /// - `CodWithAdvance`: `advance = max(minimum_advance,
    ///   ceil(grand_total × advance_fraction))`, capped at the grand total
    ///   so the remainder is never negative. The split is exact in paise:
    ///   `advance_due + remainder_due == grand_total`, always.
    ///
    /// ## Errors
    /// - `EmptyOrder` for a cart with no lines
    /// - `Validation` for a bad line item (fails before anything is built,
    ///   so a failed create yields no order at all)
    /// - `CodNotAvailable` when the policy is disabled or does not cover
    ///   the quoted zone
    pub fn create(
        id: impl Into<String>,
        line_items: Vec<LineItem>,
        payment_mode: PaymentMode,
        quote: ShipmentQuote,
        policy: &CodPolicy,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Order> {
        if line_items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        if line_items.len() > crate::MAX_ORDER_LINES {
            return Err(CoreError::Validation(
                crate::error::ValidationError::OutOfRange {
                    field: "line_items".to_string(),
                    min: 1,
                    max: crate::MAX_ORDER_LINES as i64,
                },
            ));
        }

        for item in &line_items {
            validate_line_item(item)?;
        }

        let subtotal = line_items
            .iter()
            .fold(Money::zero(), |sum, item| sum + item.line_total());
        let total_weight = line_items
            .iter()
            .fold(Weight::zero(), |sum, item| sum + item.line_weight());
        let grand_total = subtotal + quote.total_shipping;

        let (advance_due, remainder_due) = match payment_mode {
            PaymentMode::PayInFull => (grand_total, Money::zero()),
            PaymentMode::CodWithAdvance => {
                if !policy.enabled {
                    return Err(CoreError::CodNotAvailable {
                        reason: "disabled by the store".to_string(),
                    });
                }
                if !policy.allows_zone(quote.zone) {
                    return Err(CoreError::CodNotAvailable {
                        reason: format!("not offered for {} deliveries", quote.zone),
                    });
                }

                let fraction = grand_total.fraction_ceil(policy.advance_fraction_bps);
                let advance = policy.minimum_advance.max(fraction).min(grand_total);
                (advance, grand_total - advance)
            }
        };

        Ok(Order {
            id: id.into(),
            line_items,
            subtotal,
            total_weight,
            quote,
            grand_total,
            payment_mode,
            advance_due,
            remainder_due,
            status: OrderStatus::Created,
            created_at,
            advance_paid_at: None,
            fully_paid_at: None,
            advance_payment_ref: None,
            remainder_payment_ref: None,
        })
    }

    /// Records a successful advance capture.
    ///
    /// Legal only from `Created`. When nothing remains to collect after the
    /// advance (`PayInFull`, or a COD advance that already covers the grand
    /// total), the order lands directly on `FullyPaid`; otherwise it waits
    /// on `AdvancePaid` for the delivery payment.
    pub fn confirm_advance(
        &mut self,
        payment_ref: PaymentReference,
        at: DateTime<Utc>,
    ) -> CoreResult<()> {
        if self.status != OrderStatus::Created {
            return Err(self.illegal_transition("confirm advance"));
        }

        self.advance_paid_at = Some(at);
        self.advance_payment_ref = Some(payment_ref);

        if self.remainder_due.is_zero() {
            self.status = OrderStatus::FullyPaid;
            self.fully_paid_at = Some(at);
        } else {
            self.status = OrderStatus::AdvancePaid;
        }

        Ok(())
    }

    /// Records a successful remainder capture at delivery.
    ///
    /// Legal only from `AdvancePaid` with mode `CodWithAdvance` and an
    /// outstanding remainder. A `PayInFull` order never has a separate
    /// remainder step; calling this on one fails.
    pub fn confirm_remainder(
        &mut self,
        payment_ref: PaymentReference,
        at: DateTime<Utc>,
    ) -> CoreResult<()> {
        let eligible = self.status == OrderStatus::AdvancePaid
            && self.payment_mode == PaymentMode::CodWithAdvance
            && self.remainder_due.is_positive();

        if !eligible {
            return Err(self.illegal_transition("confirm remainder"));
        }

        self.remainder_due = Money::zero();
        self.remainder_payment_ref = Some(payment_ref);
        self.status = OrderStatus::FullyPaid;
        self.fully_paid_at = Some(at);

        Ok(())
    }

    /// Cancels the order.
    ///
    /// Legal from `Created` or `AdvancePaid`. Refunding an already-captured
    /// advance is the payment collaborator's concern, outside this machine.
    pub fn cancel(&mut self) -> CoreResult<()> {
        match self.status {
            OrderStatus::Created | OrderStatus::AdvancePaid => {
                self.status = OrderStatus::Cancelled;
                Ok(())
            }
            _ => Err(self.illegal_transition("cancel")),
        }
    }

    fn illegal_transition(&self, action: &str) -> CoreError {
        CoreError::IllegalTransition {
            order_id: self.id.clone(),
            status: self.status,
            action: action.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::types::Zone;

    fn quote_with_shipping(total_shipping: Money) -> ShipmentQuote {
        ShipmentQuote {
            zone: Zone::Kerala,
            base_rate: Money::from_rupees(50),
            weight_surcharge: Money::zero(),
            total_shipping,
            is_free: total_shipping.is_zero(),
            estimated_days: Zone::Kerala.delivery_days(),
        }
    }

    /// One ₹1000 item with free shipping: grand total ₹1000.
    fn thousand_rupee_cart() -> Vec<LineItem> {
        vec![LineItem {
            sku: "HDPH-BT".to_string(),
            name: "Wireless Headphones".to_string(),
            unit_price: Money::from_rupees(1000),
            quantity: 1,
            unit_weight: Weight::from_grams(250),
        }]
    }

    fn cod_order(policy: &CodPolicy) -> Order {
        Order::create(
            "ord-cod",
            thousand_rupee_cart(),
            PaymentMode::CodWithAdvance,
            quote_with_shipping(Money::zero()),
            policy,
            Utc::now(),
        )
        .unwrap()
    }

    fn pay_in_full_order() -> Order {
        Order::create(
            "ord-full",
            thousand_rupee_cart(),
            PaymentMode::PayInFull,
            quote_with_shipping(Money::zero()),
            &CodPolicy::default(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_cod_split_max_of_minimum_and_fraction() {
        // grand ₹1000, min ₹50, 10% → advance max(50, 100) = ₹100
        let order = cod_order(&CodPolicy::default());
        assert_eq!(order.advance_due, Money::from_rupees(100));
        assert_eq!(order.remainder_due, Money::from_rupees(900));
    }

    #[test]
    fn test_cod_minimum_dominates_small_orders() {
        // 10% of ₹200 is ₹20, below the ₹50 floor.
        let order = Order::create(
            "ord-small",
            vec![LineItem {
                sku: "CABLE-USB".to_string(),
                name: "USB Cable".to_string(),
                unit_price: Money::from_rupees(200),
                quantity: 1,
                unit_weight: Weight::from_grams(50),
            }],
            PaymentMode::CodWithAdvance,
            quote_with_shipping(Money::zero()),
            &CodPolicy::default(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(order.advance_due, Money::from_rupees(50));
        assert_eq!(order.remainder_due, Money::from_rupees(150));
    }

    #[test]
    fn test_cod_advance_capped_at_grand_total() {
        // Grand total ₹40 is below the ₹50 floor; the advance caps at the
        // grand total and the remainder stays non-negative.
        let order = Order::create(
            "ord-tiny",
            vec![LineItem {
                sku: "STICKER".to_string(),
                name: "Sticker Pack".to_string(),
                unit_price: Money::from_rupees(40),
                quantity: 1,
                unit_weight: Weight::from_grams(10),
            }],
            PaymentMode::CodWithAdvance,
            quote_with_shipping(Money::zero()),
            &CodPolicy::default(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(order.advance_due, Money::from_rupees(40));
        assert_eq!(order.remainder_due, Money::zero());
    }

    #[test]
    fn test_split_invariant_exact_across_fractions() {
        // No rounding leak: advance + remainder == grand total, always.
        for bps in [0, 1, 333, 1000, 2500, 9999, 10_000] {
            let policy = CodPolicy { advance_fraction_bps: bps, ..CodPolicy::default() };
            let order = cod_order(&policy);
            assert_eq!(
                order.advance_due + order.remainder_due,
                order.grand_total,
                "leak at {bps} bps"
            );
        }
    }

    #[test]
    fn test_shipping_included_in_grand_total() {
        let order = Order::create(
            "ord-shipped",
            thousand_rupee_cart(),
            PaymentMode::PayInFull,
            quote_with_shipping(Money::from_rupees(100)),
            &CodPolicy::default(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(order.grand_total, Money::from_rupees(1100));
        assert_eq!(order.advance_due, Money::from_rupees(1100));
        assert_eq!(order.remainder_due, Money::zero());
    }

    #[test]
    fn test_pay_in_full_skips_advance_paid() {
        let mut order = pay_in_full_order();
        order
            .confirm_advance(PaymentReference::new("pay_123"), Utc::now())
            .unwrap();

        assert_eq!(order.status, OrderStatus::FullyPaid);
        assert!(order.advance_paid_at.is_some());
        assert!(order.fully_paid_at.is_some());

        // No separate remainder step exists for a pay-in-full order.
        let err = order
            .confirm_remainder(PaymentReference::new("pay_456"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::IllegalTransition { .. }));
    }

    #[test]
    fn test_cod_progression_to_fully_paid() {
        let mut order = cod_order(&CodPolicy::default());
        assert_eq!(order.status, OrderStatus::Created);

        order
            .confirm_advance(PaymentReference::new("pay_adv"), Utc::now())
            .unwrap();
        assert_eq!(order.status, OrderStatus::AdvancePaid);
        assert_eq!(order.remainder_due, Money::from_rupees(900));
        assert!(order.fully_paid_at.is_none());

        order
            .confirm_remainder(PaymentReference::new("pay_rem"), Utc::now())
            .unwrap();
        assert_eq!(order.status, OrderStatus::FullyPaid);
        assert_eq!(order.remainder_due, Money::zero());
        assert_eq!(
            order.remainder_payment_ref,
            Some(PaymentReference::new("pay_rem"))
        );
    }

    #[test]
    fn test_remainder_before_advance_fails() {
        let mut order = cod_order(&CodPolicy::default());
        let err = order
            .confirm_remainder(PaymentReference::new("pay_rem"), Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::IllegalTransition { status: OrderStatus::Created, .. }
        ));
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        let mut paid = pay_in_full_order();
        paid.confirm_advance(PaymentReference::new("pay_1"), Utc::now())
            .unwrap();

        assert!(paid.confirm_advance(PaymentReference::new("x"), Utc::now()).is_err());
        assert!(paid.confirm_remainder(PaymentReference::new("x"), Utc::now()).is_err());
        assert!(paid.cancel().is_err());

        let mut cancelled = pay_in_full_order();
        cancelled.cancel().unwrap();

        assert!(cancelled.confirm_advance(PaymentReference::new("x"), Utc::now()).is_err());
        assert!(cancelled.confirm_remainder(PaymentReference::new("x"), Utc::now()).is_err());
        assert!(cancelled.cancel().is_err());
    }

    #[test]
    fn test_cancel_after_advance() {
        let mut order = cod_order(&CodPolicy::default());
        order
            .confirm_advance(PaymentReference::new("pay_adv"), Utc::now())
            .unwrap();

        order.cancel().unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_cod_rejected_when_disabled() {
        let policy = CodPolicy { enabled: false, ..CodPolicy::default() };
        let err = Order::create(
            "ord-x",
            thousand_rupee_cart(),
            PaymentMode::CodWithAdvance,
            quote_with_shipping(Money::zero()),
            &policy,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::CodNotAvailable { .. }));
    }

    #[test]
    fn test_cod_rejected_for_uncovered_zone() {
        let mut quote = quote_with_shipping(Money::from_rupees(300));
        quote.zone = Zone::International;

        let err = Order::create(
            "ord-x",
            thousand_rupee_cart(),
            PaymentMode::CodWithAdvance,
            quote,
            &CodPolicy::default(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::CodNotAvailable { .. }));
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = Order::create(
            "ord-x",
            vec![],
            PaymentMode::PayInFull,
            quote_with_shipping(Money::zero()),
            &CodPolicy::default(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::EmptyOrder));
    }

    #[test]
    fn test_bad_line_item_yields_no_order() {
        let err = Order::create(
            "ord-x",
            vec![LineItem {
                sku: "BAD".to_string(),
                name: "Bad Quantity".to_string(),
                unit_price: Money::from_rupees(10),
                quantity: 0,
                unit_weight: Weight::zero(),
            }],
            PaymentMode::PayInFull,
            quote_with_shipping(Money::zero()),
            &CodPolicy::default(),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
