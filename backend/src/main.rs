//! Gateway entry-point: loads settings, wires adapters, and serves REST
//! endpoints with OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use fallback_data::FallbackRegistry;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use gateway::config::GatewaySettings;
use gateway::domain::ports::FallbackSource;
use gateway::inbound::http::health::HealthState;
use gateway::outbound::fallback::{DisabledFallback, RegistryFallback};
use gateway::outbound::upstream::UpstreamHttpSource;
use server::{ServerConfig, create_server, drain_on, shutdown_signal};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = GatewaySettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = build_server_config(&settings)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(drain_on(shutdown_signal(), health_state, server.handle()));
    server.await
}

fn build_server_config(settings: &GatewaySettings) -> std::io::Result<ServerConfig> {
    let upstream_url = settings.upstream_url().map_err(std::io::Error::other)?;
    let upstream = UpstreamHttpSource::new(
        upstream_url.clone(),
        settings.request_timeout().map_err(std::io::Error::other)?,
        settings.connect_timeout().map_err(std::io::Error::other)?,
    )
    .map_err(|e| std::io::Error::other(format!("failed to build upstream client: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    info!(
        upstream = %upstream_url,
        bind = %bind_addr,
        fallback = settings.fallback_enabled(),
        "starting gateway"
    );

    let config = ServerConfig::new(bind_addr, Arc::new(upstream), build_fallback(settings)?);

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(make_metrics()?));

    Ok(config)
}

fn build_fallback(settings: &GatewaySettings) -> std::io::Result<Arc<dyn FallbackSource>> {
    if !settings.fallback_enabled() {
        return Ok(Arc::new(DisabledFallback));
    }
    match settings.fallback_path() {
        Some(path) => {
            let registry = FallbackRegistry::from_file(path).map_err(|e| {
                std::io::Error::other(format!(
                    "failed to load fallback dataset {}: {e}",
                    path.display()
                ))
            })?;
            Ok(Arc::new(RegistryFallback::from_registry(registry)))
        }
        None => {
            FallbackRegistry::bundled().map_err(|e| {
                std::io::Error::other(format!("bundled fallback dataset is invalid: {e}"))
            })?;
            Ok(Arc::new(RegistryFallback::bundled()))
        }
    }
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("gateway")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("configure Prometheus metrics: {e}")))
}
