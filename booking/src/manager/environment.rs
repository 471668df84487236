//! Injected dependencies for the manager reducer.

use crate::gateway::BackendGateway;
use skybook_core::environment::Clock;
use std::sync::Arc;

/// What the manager screen needs: time (for eligibility windows and refund
/// tiers) and the backend gateway.
#[derive(Clone)]
pub struct ManagerEnvironment {
    clock: Arc<dyn Clock>,
    gateway: Arc<dyn BackendGateway>,
}

impl ManagerEnvironment {
    /// Create a new manager environment.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, gateway: Arc<dyn BackendGateway>) -> Self {
        Self { clock, gateway }
    }

    /// Clock for eligibility and refund-tier computation.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Backend gateway, cloned for use inside effects.
    #[must_use]
    pub fn gateway(&self) -> Arc<dyn BackendGateway> {
        Arc::clone(&self.gateway)
    }
}
