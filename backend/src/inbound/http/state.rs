//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the gateway use-cases and remain testable without I/O.

use std::sync::Arc;

use crate::domain::GatewayService;
use crate::domain::ports::{FallbackSource, UpstreamSource};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub gateway: Arc<GatewayService>,
}

impl HttpState {
    /// Construct state from the upstream and fallback ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use gateway::domain::ports::FixtureUpstreamSource;
    /// use gateway::inbound::http::state::HttpState;
    /// use gateway::outbound::fallback::RegistryFallback;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureUpstreamSource),
    ///     Arc::new(RegistryFallback::bundled()),
    /// );
    /// let _gateway = state.gateway.clone();
    /// ```
    pub fn new(upstream: Arc<dyn UpstreamSource>, fallback: Arc<dyn FallbackSource>) -> Self {
        Self {
            gateway: Arc::new(GatewayService::new(upstream, fallback)),
        }
    }
}
