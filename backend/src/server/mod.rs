//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

use std::future::Future;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use gateway::Trace;
#[cfg(debug_assertions)]
use gateway::doc::ApiDoc;
use gateway::inbound::http::configure_api;
use gateway::inbound::http::health::{HealthState, live, ready};
use gateway::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing the adapters, binding and optional metrics.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        upstream,
        fallback,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;
    let http_state = web::Data::new(HttpState::new(upstream, fallback));

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Wait for `signal`, fail liveness, then stop the server gracefully.
///
/// [`create_server`] disables Actix's own signal handling, so the caller
/// drives shutdown through this function.
pub async fn drain_on<S>(signal: S, health_state: web::Data<HealthState>, handle: ServerHandle)
where
    S: Future<Output = ()>,
{
    signal.await;
    info!("shutdown requested; draining connections");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}

/// Resolve on Ctrl-C, or on SIGTERM where available.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use gateway::domain::ports::{FallbackSource, FixtureUpstreamSource};
    use gateway::outbound::fallback::{DisabledFallback, RegistryFallback};
    use std::sync::Arc;

    fn deps(fallback: Arc<dyn FallbackSource>) -> AppDependencies {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: web::Data::new(HttpState::new(Arc::new(FixtureUpstreamSource), fallback)),
        }
    }

    #[actix_web::test]
    async fn reads_are_served_without_an_upstream() {
        let app = test::init_service(build_app(deps(Arc::new(RegistryFallback::bundled())))).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/photos?perPage=2").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("trace-id"));
    }

    #[actix_web::test]
    async fn disabled_fallback_reports_unavailable() {
        let app = test::init_service(build_app(deps(Arc::new(DisabledFallback)))).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/contacts").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn draining_fails_liveness_and_stops_the_server() {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let server = HttpServer::new(App::new)
            .disable_signals()
            .workers(1)
            .listen(listener)
            .expect("listen")
            .run();
        let handle = server.handle();
        let running = actix_web::rt::spawn(server);

        drain_on(async {}, health_state.clone(), handle).await;

        assert!(!health_state.is_alive());
        running
            .await
            .expect("server task joins")
            .expect("server stops cleanly");
    }

    #[actix_web::test]
    async fn readiness_is_wired() {
        let app = test::init_service(build_app(deps(Arc::new(DisabledFallback)))).await;
        let response =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
