//! # Checkout Demo
//!
//! Runs a complete COD journey against the mock gateway and the in-memory
//! store, logging each step. Useful for eyeballing the flow without a
//! database or a gateway account:
//!
//! ```text
//! cargo run -p monsoon-checkout --bin demo
//! ```

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use monsoon_checkout::{
    CheckoutFlow, InMemoryOrderStore, MockGateway, QuoteInput, Quoter, SettingsHub,
};
use monsoon_core::{LineItem, Money, PaymentMode, Weight};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Arc::new(SettingsHub::default());
    let flow = CheckoutFlow::new(settings.clone(), MockGateway::new(), InMemoryOrderStore::new());

    let cart = vec![
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
    ];

    // The as-you-type quote path: the customer types a Bengaluru PIN, the
    // debounced quoter settles once on the final code.
    let quoter = Quoter::spawn(settings.subscribe_shipping());
    let subtotal = cart
        .iter()
        .fold(Money::zero(), |sum, item| sum + item.line_total());
    let weight = cart
        .iter()
        .fold(Weight::zero(), |sum, item| sum + item.line_weight());

    for partial in ["5", "560", "560034"] {
        quoter
            .request(QuoteInput {
                postal_code: partial.to_string(),
                subtotal,
                total_weight: weight,
            })
            .await;
    }

    let mut states = quoter.subscribe();
    let quote = loop {
        if let monsoon_checkout::QuoteState::Ready(quote) = states.borrow_and_update().clone() {
            break quote;
        }
        states.changed().await?;
    };
    info!(zone = %quote.zone, shipping = %quote.total_shipping, days = quote.estimated_days, "Live quote settled");

    // Place the COD order and walk it to fully paid.
    let order = flow
        .place_order(cart, PaymentMode::CodWithAdvance, "560034")
        .await?;
    info!(
        order_id = %order.id,
        grand_total = %order.grand_total,
        advance_due = %order.advance_due,
        remainder_due = %order.remainder_due,
        "COD order placed"
    );

    let order = flow.pay_advance(&order.id).await?;
    info!(status = ?order.status, "Advance confirmed");

    let order = flow.pay_remainder(&order.id).await?;
    info!(
        status = ?order.status,
        fully_paid_at = ?order.fully_paid_at,
        "Delivery payment confirmed"
    );

    Ok(())
}
