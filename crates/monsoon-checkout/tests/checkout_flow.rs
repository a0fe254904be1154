//! End-to-end checkout journeys against the SQLite-backed order store.

use std::sync::Arc;

use monsoon_checkout::{CheckoutError, CheckoutFlow, MockGateway, SettingsHub};
use monsoon_core::{
    CodPolicy, CoreError, LineItem, Money, OrderStatus, PaymentMode, Weight, Zone,
};
use monsoon_db::{Database, DbConfig};

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
        LineItem {
            sku: "CABLE-USB".to_string(),
            name: "USB Cable".to_string(),
            unit_price: Money::from_rupees(299),
            quantity: 1,
            unit_weight: Weight::from_grams(50),
        },
    ]
}

async fn sqlite_flow() -> (
    CheckoutFlow<MockGateway, monsoon_db::OrderRepository>,
    Database,
) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let flow = CheckoutFlow::new(
        Arc::new(SettingsHub::default()),
        MockGateway::new(),
        db.orders(),
    );
    (flow, db)
}

#[tokio::test]
async fn cod_journey_lands_fully_paid_in_storage() {
    let (flow, db) = sqlite_flow().await;

    // Bengaluru destination: outside the free-shipping scope, override base
    // ₹100, 0.66 kg cart stays inside the free first kilogram.
    let order = flow
        .place_order(cart(), PaymentMode::CodWithAdvance, "560034")
        .await
        .unwrap();

    assert_eq!(order.quote.zone, Zone::RestOfIndia);
    assert_eq!(order.quote.total_shipping, Money::from_rupees(100));
    // subtotal ₹2596 + shipping ₹100 = ₹2696; 10% advance = ₹269.60
    assert_eq!(order.grand_total, Money::from_rupees(2696));
    assert_eq!(order.advance_due, Money::from_paise(26_960));
    assert_eq!(
        order.advance_due + order.remainder_due,
        order.grand_total
    );

    let order = flow.pay_advance(&order.id).await.unwrap();
    assert_eq!(order.status, OrderStatus::AdvancePaid);

    let order = flow.pay_remainder(&order.id).await.unwrap();
    assert_eq!(order.status, OrderStatus::FullyPaid);
    assert_eq!(order.remainder_due, Money::zero());

    // Storage agrees with the ledger.
    let stored = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::FullyPaid);
    assert!(stored.fully_paid_at.is_some());
    assert!(stored.remainder_payment_ref.is_some());
}

#[tokio::test]
async fn pay_in_full_journey_skips_advance_paid() {
    let (flow, db) = sqlite_flow().await;

    let order = flow
        .place_order(cart(), PaymentMode::PayInFull, "682001")
        .await
        .unwrap();
    // Kerala + subtotal over the threshold → free shipping frozen into the
    // quote snapshot.
    assert!(order.quote.is_free);
    assert_eq!(order.remainder_due, Money::zero());

    let order = flow.pay_advance(&order.id).await.unwrap();
    assert_eq!(order.status, OrderStatus::FullyPaid);

    let err = flow.pay_remainder(&order.id).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Core(CoreError::IllegalTransition { .. })
    ));

    let stored = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::FullyPaid);
}

#[tokio::test]
async fn racing_advance_payments_yield_one_success() {
    let (flow, _db) = sqlite_flow().await;
    let flow = Arc::new(flow);

    let order = flow
        .place_order(cart(), PaymentMode::CodWithAdvance, "682001")
        .await
        .unwrap();

    let a = {
        let flow = flow.clone();
        let id = order.id.clone();
        tokio::spawn(async move { flow.pay_advance(&id).await })
    };
    let b = {
        let flow = flow.clone();
        let id = order.id.clone();
        tokio::spawn(async move { flow.pay_advance(&id).await })
    };

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    // Exactly one confirmation lands; the loser sees the advanced status.
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);

    let current = flow.order(&order.id).await.unwrap();
    assert_eq!(current.status, OrderStatus::AdvancePaid);
}

#[tokio::test]
async fn cod_unavailable_outside_policy_zones() {
    let (flow, _db) = sqlite_flow().await;

    // Default policy covers domestic zones only.
    let err = flow
        .place_order(cart(), PaymentMode::CodWithAdvance, "SW1A 1AA")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Core(CoreError::CodNotAvailable { .. })
    ));

    // Pay-in-full still works for the same destination.
    let order = flow
        .place_order(cart(), PaymentMode::PayInFull, "SW1A 1AA")
        .await
        .unwrap();
    assert_eq!(order.quote.zone, Zone::International);
}

#[tokio::test]
async fn policy_swap_applies_to_new_orders_only() {
    let (flow, _db) = sqlite_flow().await;

    let before = flow
        .place_order(cart(), PaymentMode::CodWithAdvance, "682001")
        .await
        .unwrap();

    // Admin raises the advance to 25%.
    flow.settings()
        .update_cod_policy(CodPolicy {
            advance_fraction_bps: 2500,
            ..CodPolicy::default()
        })
        .unwrap();

    let after = flow
        .place_order(cart(), PaymentMode::CodWithAdvance, "682001")
        .await
        .unwrap();

    // The earlier order keeps its split; only the new one sees 25%.
    assert_eq!(before.advance_due, before.grand_total.fraction_ceil(1000));
    assert_eq!(after.advance_due, after.grand_total.fraction_ceil(2500));

    let tracked = flow.order(&before.id).await.unwrap();
    assert_eq!(tracked.advance_due, before.advance_due);
}
