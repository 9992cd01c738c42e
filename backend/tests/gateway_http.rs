//! End-to-end gateway behaviour over real sockets.
//!
//! A stub upstream and the gateway both listen on ephemeral ports; requests
//! go through reqwest so URL building, header forwarding, status decoding
//! and the fallback policy are exercised together.

mod support;

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

use support::stub_upstream::{StubMode, spawn_stub_upstream};
use support::{
    UNREACHABLE_UPSTREAM, spawn_gateway, spawn_gateway_with_timeout, spawn_silent_upstream,
};

async fn get_json(url: &str, auth: Option<&str>) -> (StatusCode, Option<String>, Value) {
    let mut request = Client::new().get(url);
    if let Some(auth) = auth {
        request = request.header("Authorization", auth);
    }
    let response = request.send().await.expect("gateway reachable");
    let status = response.status();
    let trace_id = response
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = response.json().await.expect("JSON body");
    (status, trace_id, body)
}

#[actix_web::test]
async fn live_lists_are_relayed_with_forwarded_headers() {
    let upstream = spawn_stub_upstream(StubMode::Healthy).expect("stub starts");
    let gateway = spawn_gateway(&upstream.base_url, true).expect("gateway starts");

    let (status, trace_id, body) = get_json(
        &format!("{}/blogs?category=tech&search=%20live%20&status=all", gateway.base_url),
        Some("Bearer t1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["id"], 101);
    assert_eq!(body["items"][0]["stats"]["views"], 12);
    assert_eq!(body["pagination"]["total"], 1);

    let seen = upstream.seen();
    assert_eq!(seen.len(), 1);
    let call = seen.first().expect("one upstream call");
    assert_eq!(call.path, "/v1/blogs");
    assert_eq!(call.query, "page=1&perPage=10&search=live&category=TECH");
    assert_eq!(call.authorization.as_deref(), Some("Bearer t1"));
    assert_eq!(call.trace_id, trace_id);

    gateway.handle.stop(true).await;
    upstream.stop().await;
}

#[rstest]
#[case::unreachable(None)]
#[case::server_error(Some(503))]
#[actix_web::test]
async fn failing_upstreams_serve_the_fallback_dataset(#[case] failing_status: Option<u16>) {
    let upstream = match failing_status {
        Some(status) => Some(spawn_stub_upstream(StubMode::Failing(status)).expect("stub starts")),
        None => None,
    };
    let base = upstream
        .as_ref()
        .map_or(UNREACHABLE_UPSTREAM, |stub| stub.base_url.as_str());
    let gateway = spawn_gateway(base, true).expect("gateway starts");

    let (status, _, body) = get_json(&format!("{}/blogs?perPage=4", gateway.base_url), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 6);
    assert_eq!(body["pagination"]["totalPage"], 2);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(4));
    assert_eq!(body["items"][0]["id"], 24);

    gateway.handle.stop(true).await;
    if let Some(stub) = upstream {
        stub.stop().await;
    }
}

#[actix_web::test]
async fn silent_upstreams_time_out_into_the_fallback_dataset() {
    let upstream = spawn_silent_upstream().await.expect("listener binds");
    let gateway = spawn_gateway_with_timeout(&upstream.base_url, true, Duration::from_millis(300))
        .expect("gateway starts");

    let started = Instant::now();
    let (status, _, body) =
        get_json(&format!("{}/contacts?search=coffee", gateway.base_url), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["items"][0]["id"], 3);
    assert!(started.elapsed() < Duration::from_secs(5));

    gateway.handle.stop(true).await;
    drop(upstream);
}

#[actix_web::test]
async fn answered_not_found_is_never_masked() {
    let upstream = spawn_stub_upstream(StubMode::Healthy).expect("stub starts");
    let gateway = spawn_gateway(&upstream.base_url, true).expect("gateway starts");

    let (status, trace_id, body) =
        get_json(&format!("{}/blogs/24", gateway.base_url), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Blog not found");
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["traceId"].as_str(), trace_id.as_deref());

    gateway.handle.stop(true).await;
    upstream.stop().await;
}

#[actix_web::test]
async fn disabled_fallback_reports_unavailable() {
    let gateway = spawn_gateway(UNREACHABLE_UPSTREAM, false).expect("gateway starts");

    let (status, _, body) = get_json(&format!("{}/photos", gateway.base_url), None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");

    gateway.handle.stop(true).await;
}

#[actix_web::test]
async fn writes_are_forwarded_with_credentials() {
    let upstream = spawn_stub_upstream(StubMode::Healthy).expect("stub starts");
    let gateway = spawn_gateway(&upstream.base_url, true).expect("gateway starts");

    let response = Client::new()
        .post(format!("{}/blogs", gateway.base_url))
        .header("Authorization", "Bearer t1")
        .json(&json!({
            "title": "  Fresh  ",
            "content": "Body",
            "category": "tech",
            "tags": ["rust", " ", "web"]
        }))
        .send()
        .await
        .expect("gateway reachable");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("JSON body");
    assert_eq!(body["id"], 102);
    assert_eq!(body["title"], "Fresh");

    let seen = upstream.seen();
    let call = seen.first().expect("one upstream call");
    assert_eq!(call.method, "POST");
    assert_eq!(call.authorization.as_deref(), Some("Bearer t1"));
    let forwarded = call.body.as_ref().expect("forwarded body");
    assert_eq!(forwarded["title"], "Fresh");
    assert_eq!(forwarded["category"], "TECH");
    assert_eq!(forwarded["tags"], json!(["rust", "web"]));

    gateway.handle.stop(true).await;
    upstream.stop().await;
}

#[rstest]
#[case::unreachable(None, StatusCode::SERVICE_UNAVAILABLE)]
#[case::server_error(Some(500), StatusCode::INTERNAL_SERVER_ERROR)]
#[actix_web::test]
async fn failed_writes_surface_the_failure(
    #[case] failing_status: Option<u16>,
    #[case] expected: StatusCode,
) {
    let upstream = match failing_status {
        Some(status) => Some(spawn_stub_upstream(StubMode::Failing(status)).expect("stub starts")),
        None => None,
    };
    let base = upstream
        .as_ref()
        .map_or(UNREACHABLE_UPSTREAM, |stub| stub.base_url.as_str());
    let gateway = spawn_gateway(base, true).expect("gateway starts");

    let response = Client::new()
        .delete(format!("{}/contacts/3", gateway.base_url))
        .header("Authorization", "Bearer t1")
        .send()
        .await
        .expect("gateway reachable");

    assert_eq!(response.status(), expected);

    gateway.handle.stop(true).await;
    if let Some(stub) = upstream {
        stub.stop().await;
    }
}

#[rstest]
#[case::accepted("password", StatusCode::OK)]
#[case::rejected("wrong", StatusCode::UNAUTHORIZED)]
#[actix_web::test]
async fn logins_are_relayed(#[case] password: &str, #[case] expected: StatusCode) {
    let upstream = spawn_stub_upstream(StubMode::Healthy).expect("stub starts");
    let gateway = spawn_gateway(&upstream.base_url, true).expect("gateway starts");

    let response = Client::new()
        .post(format!("{}/auth/login", gateway.base_url))
        .json(&json!({ "username": "admin", "password": password }))
        .send()
        .await
        .expect("gateway reachable");

    assert_eq!(response.status(), expected);
    let seen = upstream.seen();
    assert_eq!(seen.first().map(|call| call.path.as_str()), Some("/v1/auth/login"));

    gateway.handle.stop(true).await;
    upstream.stop().await;
}
