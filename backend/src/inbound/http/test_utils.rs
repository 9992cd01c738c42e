//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::{test, web};
use serde_json::Value;

use crate::domain::ports::MockUpstreamSource;
use crate::inbound::http::state::HttpState;
use crate::outbound::fallback::RegistryFallback;

/// Handler state over a mocked upstream and the bundled fallback dataset.
pub fn state_with_upstream(upstream: MockUpstreamSource) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(upstream),
        Arc::new(RegistryFallback::bundled()),
    ))
}

/// Read a response body as JSON.
pub async fn read_json<B: MessageBody>(response: ServiceResponse<B>) -> Value {
    let bytes = test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
