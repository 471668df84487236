//! Payment processor capability: card input and payment confirmation.
//!
//! Models the processor SDK surface the wizard depends on: a mountable
//! card-input element, a validity-change feed from that element, and the
//! confirm-card-payment handshake that consumes a payment intent's client
//! secret. Processor error messages are surfaced to the user verbatim.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::broadcast;

/// Boxed future returned by processor calls.
pub type PaymentFuture<T> = Pin<Box<dyn Future<Output = Result<T, PaymentError>> + Send>>;

/// Failure reported by the payment processor.
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// The card was declined
    #[error("{reason}")]
    CardDeclined {
        /// Decline reason as reported by the processor
        reason: String,
    },

    /// The processor SDK could not be reached or initialized
    #[error("Failed to load payment processor. Please try again later.")]
    ProcessorUnavailable,

    /// Any other processor-side failure
    #[error("{message}")]
    Other {
        /// Processor error message
        message: String,
    },
}

/// Validity change emitted by the card element as the user types.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardChange {
    /// Current input error, `None` once the card details are valid
    pub error: Option<String>,
}

/// Result of a successful card confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfirmation {
    /// The processor-side intent that was confirmed
    pub payment_intent_id: String,
}

/// Billing details attached to the card confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    /// Cardholder name
    pub name: String,
    /// Cardholder email
    pub email: String,
}

/// The processor capability surface consumed by the wizard.
///
/// Initialization with a publishable key happens when the concrete
/// processor is constructed; the wizard only mounts the card element,
/// watches its validity feed, and confirms payments.
pub trait PaymentProcessor: Send + Sync {
    /// Create and mount the card-input element into the host surface.
    ///
    /// Idempotent: mounting an already-mounted element recreates it.
    ///
    /// # Errors
    ///
    /// Returns an error when the element cannot be created or mounted.
    fn mount_card_element(&self) -> PaymentFuture<()>;

    /// Whether the processor is initialized and the card element mounted.
    fn card_ready(&self) -> bool;

    /// Subscribe to the card element's validity-change events.
    fn card_changes(&self) -> broadcast::Receiver<CardChange>;

    /// Confirm a card payment for the given intent secret.
    ///
    /// # Errors
    ///
    /// Returns the processor's error (surfaced verbatim to the user) when
    /// confirmation fails.
    fn confirm_card_payment(
        &self,
        client_secret: String,
        billing: BillingDetails,
    ) -> PaymentFuture<CardConfirmation>;
}

// ============================================================================
// Development mock
// ============================================================================

/// Mock payment processor for development and tests.
///
/// Confirms every payment unless constructed with [`MockPaymentProcessor::declining`],
/// in which case every confirmation fails with the given reason.
pub struct MockPaymentProcessor {
    mounted: AtomicBool,
    decline_reason: Option<String>,
    changes: broadcast::Sender<CardChange>,
}

impl MockPaymentProcessor {
    /// Create a mock processor that approves every payment.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            mounted: AtomicBool::new(false),
            decline_reason: None,
            changes,
        }
    }

    /// Create a mock processor that declines every payment.
    #[must_use]
    pub fn declining(reason: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            mounted: AtomicBool::new(false),
            decline_reason: Some(reason.into()),
            changes,
        }
    }

    /// Creates an Arc-wrapped instance for sharing.
    #[must_use]
    pub fn shared() -> Arc<dyn PaymentProcessor> {
        Arc::new(Self::new())
    }

    /// Push a validity-change event, as the real element would while the
    /// user types.
    pub fn emit_card_change(&self, error: Option<String>) {
        let _ = self.changes.send(CardChange { error });
    }
}

impl Default for MockPaymentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentProcessor for MockPaymentProcessor {
    fn mount_card_element(&self) -> PaymentFuture<()> {
        self.mounted.store(true, Ordering::SeqCst);
        Box::pin(async {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            Ok(())
        })
    }

    fn card_ready(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    fn card_changes(&self) -> broadcast::Receiver<CardChange> {
        self.changes.subscribe()
    }

    fn confirm_card_payment(
        &self,
        client_secret: String,
        billing: BillingDetails,
    ) -> PaymentFuture<CardConfirmation> {
        let decline = self.decline_reason.clone();
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;

            if let Some(reason) = decline {
                tracing::info!(name = %billing.name, "Mock card payment declined");
                return Err(PaymentError::CardDeclined { reason });
            }

            // client secrets look like "{intent_id}_secret_{nonce}"
            let payment_intent_id = client_secret
                .split("_secret")
                .next()
                .unwrap_or(client_secret.as_str())
                .to_string();

            tracing::info!(
                name = %billing.name,
                intent = %payment_intent_id,
                "Mock card payment confirmed"
            );
            Ok(CardConfirmation { payment_intent_id })
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_confirms_and_extracts_the_intent_id() {
        let processor = MockPaymentProcessor::new();
        processor.mount_card_element().await.unwrap();
        assert!(processor.card_ready());

        let confirmation = processor
            .confirm_card_payment(
                "pi_123_secret_abc".to_string(),
                BillingDetails {
                    name: "Asha Rao".to_string(),
                    email: "asha@example.com".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(confirmation.payment_intent_id, "pi_123");
    }

    #[tokio::test]
    async fn declining_mock_surfaces_the_reason_verbatim() {
        let processor = MockPaymentProcessor::declining("Your card was declined.");

        let error = processor
            .confirm_card_payment(
                "pi_1_secret_x".to_string(),
                BillingDetails {
                    name: "Asha Rao".to_string(),
                    email: "asha@example.com".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Your card was declined.");
    }

    #[tokio::test]
    async fn card_changes_reach_subscribers() {
        let processor = MockPaymentProcessor::new();
        let mut changes = processor.card_changes();

        processor.emit_card_change(Some("Incomplete card number.".to_string()));

        let change = changes.recv().await.unwrap();
        assert_eq!(change.error.as_deref(), Some("Incomplete card number."));
    }
}
