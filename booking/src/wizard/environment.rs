//! Injected dependencies for the wizard reducer.

use crate::gateway::BackendGateway;
use crate::payment::PaymentProcessor;
use skybook_core::environment::{Clock, RandomSource};
use std::sync::Arc;

/// Everything external the wizard needs: time, randomness, the backend
/// gateway, and the payment processor.
#[derive(Clone)]
pub struct WizardEnvironment {
    clock: Arc<dyn Clock>,
    gateway: Arc<dyn BackendGateway>,
    payments: Arc<dyn PaymentProcessor>,
    random: Arc<dyn RandomSource>,
}

impl WizardEnvironment {
    /// Create a new wizard environment.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        gateway: Arc<dyn BackendGateway>,
        payments: Arc<dyn PaymentProcessor>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            clock,
            gateway,
            payments,
            random,
        }
    }

    /// Clock for dates and timestamps.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Backend gateway, cloned for use inside effects.
    #[must_use]
    pub fn gateway(&self) -> Arc<dyn BackendGateway> {
        Arc::clone(&self.gateway)
    }

    /// Payment processor, cloned for use inside effects.
    #[must_use]
    pub fn payments(&self) -> Arc<dyn PaymentProcessor> {
        Arc::clone(&self.payments)
    }

    /// Random source for seat-map occupancy.
    #[must_use]
    pub fn random(&self) -> &dyn RandomSource {
        self.random.as_ref()
    }
}
