//! # Debounced Quoter
//!
//! Turns a stream of keystroke-level quote inputs into settled quotes.
//!
//! ## Why Debounce
//! The storefront re-quotes as the customer types their PIN code. Quoting on
//! every keystroke is wasted work, and worse, a slow earlier quote landing
//! after a fast later one would show the wrong price. This task waits for a
//! short quiescent window (default 300 ms) before quoting, and a newer input
//! simply replaces the pending one, so a fast typist never sees a quote for
//! an abandoned code.
//!
//! ## Task Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Quoter Task                                    │
//! │                                                                         │
//! │  input mpsc ──┐                                                        │
//! │               ▼                                                         │
//! │        ┌─────────────┐   debounce    ┌───────────────┐                 │
//! │        │ pending:    │──────────────►│ quote_shipment│──► state watch  │
//! │        │ last input  │   elapsed     │ (pure core)   │    Idle/Pending │
//! │        └─────────────┘               └───────────────┘    Ready/       │
//! │               ▲                             ▲              Rejected    │
//! │               │ newer input replaces        │                          │
//! │               │ (stale quote never runs)    │                          │
//! │                                             │                          │
//! │  config watch ──────────────────────────────┘                          │
//! │  (swap → requote the last settled input immediately)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, warn};

use monsoon_core::rate::quote_shipment;
use monsoon_core::{Money, ShipmentQuote, ShippingConfig, Weight};

/// Quiescent window before a pending input is quoted.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Buffered inputs; beyond this, `request` awaits (a human cannot type
/// faster than the task drains).
const INPUT_BUFFER: usize = 16;

// =============================================================================
// Quote State
// =============================================================================

/// One quote input: destination plus the cart figures it prices against.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteInput {
    pub postal_code: String,
    pub subtotal: Money,
    pub total_weight: Weight,
}

/// What the checkout surface renders.
///
/// Only `Ready` may enable the pay button; `Rejected` carries the message
/// for "we can't ship there".
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteState {
    /// No input yet.
    Idle,
    /// Input received; debounce window open.
    Pending,
    /// Settled quote for the most recent input.
    Ready(ShipmentQuote),
    /// The most recent input failed to quote.
    Rejected(String),
}

impl QuoteState {
    /// Whether checkout may proceed to payment.
    pub fn is_ready(&self) -> bool {
        matches!(self, QuoteState::Ready(_))
    }
}

// =============================================================================
// Quoter Handle
// =============================================================================

/// Handle to a spawned quoter task.
///
/// Dropping every handle closes the input channel and ends the task.
#[derive(Debug, Clone)]
pub struct Quoter {
    input_tx: mpsc::Sender<QuoteInput>,
    state_rx: watch::Receiver<QuoteState>,
}

impl Quoter {
    /// Spawns a quoter against a shipping-config subscription.
    pub fn spawn(config_rx: watch::Receiver<Arc<ShippingConfig>>) -> Quoter {
        Quoter::spawn_with_debounce(config_rx, DEFAULT_DEBOUNCE)
    }

    /// Spawns a quoter with an explicit debounce window (tests use short
    /// windows; zero quotes immediately).
    pub fn spawn_with_debounce(
        config_rx: watch::Receiver<Arc<ShippingConfig>>,
        debounce: Duration,
    ) -> Quoter {
        let (input_tx, input_rx) = mpsc::channel(INPUT_BUFFER);
        let (state_tx, state_rx) = watch::channel(QuoteState::Idle);

        tokio::spawn(run(input_rx, config_rx, state_tx, debounce));

        Quoter { input_tx, state_rx }
    }

    /// Submits a new input, superseding any pending one.
    ///
    /// Returns `false` if the task has already shut down.
    pub async fn request(&self, input: QuoteInput) -> bool {
        self.input_tx.send(input).await.is_ok()
    }

    /// The current quote state.
    pub fn state(&self) -> QuoteState {
        self.state_rx.borrow().clone()
    }

    /// Subscribes to quote state changes.
    pub fn subscribe(&self) -> watch::Receiver<QuoteState> {
        self.state_rx.clone()
    }
}

// =============================================================================
// Task Loop
// =============================================================================

async fn run(
    mut input_rx: mpsc::Receiver<QuoteInput>,
    mut config_rx: watch::Receiver<Arc<ShippingConfig>>,
    state_tx: watch::Sender<QuoteState>,
    debounce: Duration,
) {
    // The input waiting out its debounce window, and when the window closes.
    let mut pending: Option<QuoteInput> = None;
    let mut deadline: Option<Instant> = None;
    // The input behind the currently published quote; requoted on config
    // swaps so the customer always sees prices for the live rate card.
    let mut settled: Option<QuoteInput> = None;

    loop {
        // Instant is Copy; capture the current deadline by value so the
        // timer future never borrows across the handler bodies.
        let window_deadline = deadline;
        let window = async move {
            match window_deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            maybe_input = input_rx.recv() => {
                match maybe_input {
                    Some(input) => {
                        debug!(postal_code = %input.postal_code, "Quote input received");
                        pending = Some(input);
                        deadline = Some(Instant::now() + debounce);
                        state_tx.send_replace(QuoteState::Pending);
                    }
                    None => {
                        debug!("Quoter input channel closed, stopping");
                        break;
                    }
                }
            }

            changed = config_rx.changed() => {
                if changed.is_err() {
                    warn!("Settings hub dropped, stopping quoter");
                    break;
                }
                // Push-based invalidation: requote the settled input right
                // away. A pending input keeps its own debounce window.
                if pending.is_none() {
                    if let Some(input) = settled.clone() {
                        publish(&state_tx, &config_rx, &input);
                    }
                }
            }

            _ = window, if pending.is_some() => {
                deadline = None;
                // Only the latest input survives the window; everything the
                // customer typed through is already gone.
                if let Some(input) = pending.take() {
                    publish(&state_tx, &config_rx, &input);
                    settled = Some(input);
                }
            }
        }
    }
}

/// Quotes one input against the live config and publishes the outcome.
fn publish(
    state_tx: &watch::Sender<QuoteState>,
    config_rx: &watch::Receiver<Arc<ShippingConfig>>,
    input: &QuoteInput,
) {
    let config = config_rx.borrow().clone();
    let state = match quote_shipment(&config, &input.postal_code, input.subtotal, input.total_weight)
    {
        Ok(quote) => {
            debug!(
                postal_code = %input.postal_code,
                total_shipping = %quote.total_shipping,
                is_free = quote.is_free,
                "Quote settled"
            );
            QuoteState::Ready(quote)
        }
        Err(err) => {
            debug!(postal_code = %input.postal_code, %err, "Quote rejected");
            QuoteState::Rejected(err.to_string())
        }
    };

    state_tx.send_replace(state);
}

// =============================================================================
// Unit Tests
// =============================================================================
