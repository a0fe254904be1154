//! # monsoon-checkout: Checkout Orchestration for Monsoon
//!
//! The async layer between the storefront and the pure core.
//!
//! ## Components
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       monsoon-checkout                                  │
//! │                                                                         │
//! │  ┌──────────────┐    watch     ┌──────────────┐                        │
//! │  │ SettingsHub  │─────────────►│    Quoter    │  debounced postal-code │
//! │  │ swap+notify  │              │  (task)      │  quoting for the UI    │
//! │  └──────┬───────┘              └──────────────┘                        │
//! │         │ current()                                                     │
//! │         ▼                                                               │
//! │  ┌──────────────┐   per-order  ┌──────────────┐   ┌──────────────┐     │
//! │  │ CheckoutFlow │─────────────►│ OrderLedger  │   │ collaborators│     │
//! │  │ quote/place/ │    locks     │ serialized   │   │ PaymentGate- │     │
//! │  │ pay/cancel   │              │ transitions  │   │ way + Order- │     │
//! │  └──────────────┘              └──────────────┘   │ Store traits │     │
//! │                                                   └──────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rate math and lifecycle rules live in `monsoon-core`; SQL lives in
//! `monsoon-db`. This crate owns time, concurrency, and the collaborator
//! boundaries.

pub mod error;
pub mod flow;
pub mod gateway;
pub mod ledger;
pub mod quoter;
pub mod settings;
pub mod store;

pub use error::{CaptureError, CheckoutError, ConfigError};
pub use flow::CheckoutFlow;
pub use gateway::{CaptureMetadata, CapturePurpose, MockGateway, PaymentGateway};
pub use ledger::OrderLedger;
pub use quoter::{QuoteInput, QuoteState, Quoter, DEFAULT_DEBOUNCE};
pub use settings::SettingsHub;
pub use store::{InMemoryOrderStore, OrderStore, StoreError};
