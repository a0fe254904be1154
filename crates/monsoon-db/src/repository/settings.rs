//! # Settings Repository
//!
//! Durable storage for the admin-editable settings records: the shipping
//! config, the COD policy, and the payment-method toggles.
//!
//! Each record is one JSON payload under a well-known key. The records are
//! read once at boot to seed the live settings hub and written back on every
//! admin save; the hub, not this table, is what quote traffic reads.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use monsoon_core::{CodPolicy, PaymentMethodToggles, ShippingConfig};

/// Key for the shipping configuration record.
pub const SHIPPING_CONFIG_KEY: &str = "shipping_config";
/// Key for the COD policy record.
pub const COD_POLICY_KEY: &str = "cod_policy";
/// Key for the payment-method toggles record.
pub const PAYMENT_METHODS_KEY: &str = "payment_methods";

/// Repository for the keyed settings records.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Loads the shipping configuration, if one has been saved.
    pub async fn load_shipping_config(&self) -> DbResult<Option<ShippingConfig>> {
        self.load(SHIPPING_CONFIG_KEY).await
    }

    /// Saves the shipping configuration.
    pub async fn save_shipping_config(&self, config: &ShippingConfig) -> DbResult<()> {
        self.save(SHIPPING_CONFIG_KEY, config, config.updated_at).await
    }

    /// Loads the COD policy, if one has been saved.
    pub async fn load_cod_policy(&self) -> DbResult<Option<CodPolicy>> {
        self.load(COD_POLICY_KEY).await
    }

    /// Saves the COD policy.
    pub async fn save_cod_policy(&self, policy: &CodPolicy, at: DateTime<Utc>) -> DbResult<()> {
        self.save(COD_POLICY_KEY, policy, at).await
    }

    /// Loads the payment-method toggles, if they have been saved.
    pub async fn load_payment_methods(&self) -> DbResult<Option<PaymentMethodToggles>> {
        self.load(PAYMENT_METHODS_KEY).await
    }

    /// Saves the payment-method toggles.
    pub async fn save_payment_methods(
        &self,
        methods: &PaymentMethodToggles,
        at: DateTime<Utc>,
    ) -> DbResult<()> {
        self.save(PAYMENT_METHODS_KEY, methods, at).await
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        let row = sqlx::query("SELECT payload FROM settings WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: String = row.try_get("payload")?;
        let record = serde_json::from_str(&payload).map_err(|source| DbError::InvalidPayload {
            key: key.to_string(),
            source,
        })?;

        Ok(Some(record))
    }

    async fn save<T: Serialize>(&self, key: &str, record: &T, at: DateTime<Utc>) -> DbResult<()> {
        debug!(key, "Saving settings record");

        let payload = serde_json::to_string(record).map_err(|source| DbError::InvalidPayload {
            key: key.to_string(),
            source,
        })?;

        sqlx::query(
            r#"
            INSERT INTO settings (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
