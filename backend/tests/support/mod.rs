//! Shared harness for gateway integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

pub mod stub_upstream;

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use gateway::Trace;
use gateway::domain::ports::FallbackSource;
use gateway::inbound::http::configure_api;
use gateway::inbound::http::state::HttpState;
use gateway::outbound::fallback::{DisabledFallback, RegistryFallback};
use gateway::outbound::upstream::UpstreamHttpSource;
use tokio::task::JoinHandle;
use url::Url;

/// Upstream base URL where nothing listens.
pub const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:1/v1";

/// Handle to a running gateway.
pub struct GatewayServer {
    pub base_url: String,
    pub handle: ServerHandle,
}

/// An upstream that accepts connections and never answers.
///
/// Accepted sockets are held open until the value is dropped.
pub struct SilentUpstream {
    pub base_url: String,
    task: JoinHandle<()>,
}

impl Drop for SilentUpstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Bind a [`SilentUpstream`] on an ephemeral port.
pub async fn spawn_silent_upstream() -> std::io::Result<SilentUpstream> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let task = actix_web::rt::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    Ok(SilentUpstream {
        base_url: format!("http://{addr}/v1"),
        task,
    })
}

/// Start the gateway on an ephemeral port in front of `upstream_base`.
pub fn spawn_gateway(upstream_base: &str, fallback_enabled: bool) -> std::io::Result<GatewayServer> {
    spawn_gateway_with_timeout(upstream_base, fallback_enabled, Duration::from_secs(2))
}

/// As [`spawn_gateway`], with an explicit upstream request timeout.
pub fn spawn_gateway_with_timeout(
    upstream_base: &str,
    fallback_enabled: bool,
    request_timeout: Duration,
) -> std::io::Result<GatewayServer> {
    let base = Url::parse(upstream_base).map_err(std::io::Error::other)?;
    let upstream = UpstreamHttpSource::new(base, request_timeout, Duration::from_millis(500))
        .map_err(std::io::Error::other)?;
    let fallback: Arc<dyn FallbackSource> = if fallback_enabled {
        Arc::new(RegistryFallback::bundled())
    } else {
        Arc::new(DisabledFallback)
    };
    let state = web::Data::new(HttpState::new(Arc::new(upstream), fallback));

    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok(GatewayServer {
        base_url: format!("http://{addr}/api/v1"),
        handle,
    })
}
