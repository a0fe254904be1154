//! # monsoon-db: Database Layer for Monsoon
//!
//! SQLite persistence for orders and admin settings.
//!
//! ## Responsibilities
//! - Connection pool management ([`pool`])
//! - Schema migrations ([`migrations`])
//! - Repositories ([`repository`]): orders (create + payment-state updates)
//!   and the keyed settings records
//!
//! Business logic lives in `monsoon-core`; this crate only moves data. The
//! live broadcast of settings changes is `monsoon-checkout`'s job - this
//! crate is read once at boot and written on admin saves.
//!
//! ## Example
//! ```rust,ignore
//! use monsoon_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./monsoon.db")).await?;
//! let order = db.orders().get_by_id("...").await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{OrderRepository, SettingsRepository};
