//! # Payment Capture Boundary
//!
//! The opaque "charge" capability the checkout flow invokes around
//! lifecycle transitions. Real deployments put a Razorpay or Stripe client
//! behind this trait; the engine never sees gateway protocol details, only
//! an amount going out and a [`PaymentReference`] coming back.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::CaptureError;
use monsoon_core::{Money, PaymentReference};

// =============================================================================
// Capture Metadata
// =============================================================================

/// Which half of the order a capture collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePurpose {
    /// The up-front amount (full payment, or the COD advance).
    Advance,
    /// The COD remainder, collected at delivery.
    Remainder,
}

impl std::fmt::Display for CapturePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapturePurpose::Advance => write!(f, "advance"),
            CapturePurpose::Remainder => write!(f, "remainder"),
        }
    }
}

/// Context sent along with a capture, for gateway-side reconciliation.
#[derive(Debug, Clone)]
pub struct CaptureMetadata {
    /// The order this capture belongs to.
    pub order_id: String,
    /// Which half of the order it collects.
    pub purpose: CapturePurpose,
}

// =============================================================================
// Gateway Trait
// =============================================================================

/// The payment collaborator.
///
/// A successful return means the money is captured; the flow only then
/// confirms the corresponding lifecycle transition. Failures are surfaced
/// untouched - no retries happen at this layer.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Captures `amount` in `currency`, returning the gateway's reference.
    async fn capture(
        &self,
        amount: Money,
        currency: &str,
        metadata: CaptureMetadata,
    ) -> Result<PaymentReference, CaptureError>;
}

// =============================================================================
// Mock Gateway
// =============================================================================

/// Deterministic in-process gateway for tests and the demo binary.
///
/// References are sequential (`pay_mock_000001`, ...). `fail_next()` scripts
/// a one-shot failure, the way a declined card would surface.
#[derive(Debug, Default)]
pub struct MockGateway {
    counter: AtomicU64,
    fail_next: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        MockGateway::default()
    }

    /// Makes the next capture fail with a declined-payment error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// How many captures have succeeded.
    pub fn captures(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn capture(
        &self,
        amount: Money,
        currency: &str,
        metadata: CaptureMetadata,
    ) -> Result<PaymentReference, CaptureError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(CaptureError {
                provider: "mock".to_string(),
                message: format!(
                    "declined {} capture of {} {} for order {}",
                    metadata.purpose, amount, currency, metadata.order_id
                ),
            });
        }

        let seq = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PaymentReference::new(format!("pay_mock_{seq:06}")))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use monsoon_core::CURRENCY;

    fn metadata() -> CaptureMetadata {
        CaptureMetadata {
            order_id: "ord-1".to_string(),
            purpose: CapturePurpose::Advance,
        }
    }

    #[tokio::test]
    async fn test_mock_capture_returns_sequential_references() {
        let gateway = MockGateway::new();

        let a = gateway
            .capture(Money::from_rupees(100), CURRENCY, metadata())
            .await
            .unwrap();
        let b = gateway
            .capture(Money::from_rupees(900), CURRENCY, metadata())
            .await
            .unwrap();

        assert_eq!(a.as_str(), "pay_mock_000001");
        assert_eq!(b.as_str(), "pay_mock_000002");
        assert_eq!(gateway.captures(), 2);
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let gateway = MockGateway::new();
        gateway.fail_next();

        let err = gateway
            .capture(Money::from_rupees(100), CURRENCY, metadata())
            .await
            .unwrap_err();
        assert!(err.message.contains("ord-1"));

        // The failure was consumed; the next capture goes through.
        assert!(gateway
            .capture(Money::from_rupees(100), CURRENCY, metadata())
            .await
            .is_ok());
    }
}
