//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use gateway::domain::ports::{FallbackSource, UpstreamSource};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upstream: Arc<dyn UpstreamSource>,
    pub(crate) fallback: Arc<dyn FallbackSource>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from the gateway's adapters.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        upstream: Arc<dyn UpstreamSource>,
        fallback: Arc<dyn FallbackSource>,
    ) -> Self {
        Self {
            bind_addr,
            upstream,
            fallback,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
