//! A stub upstream content service served over a real socket.
//!
//! Every request is recorded. The stub either answers like a healthy
//! service or fails every call with one status.

use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

/// How the stub answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMode {
    /// Serve one blog page, echo writes, accept `admin`/`password`.
    Healthy,
    /// Answer every request with this status.
    Failing(u16),
}

/// One request the stub received.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub trace_id: Option<String>,
    pub body: Option<Value>,
}

/// Handle to a running stub.
pub struct StubUpstream {
    pub base_url: String,
    pub handle: ServerHandle,
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl StubUpstream {
    /// Requests received so far.
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("seen lock").clone()
    }

    /// Stop the server and wait for it to drain.
    pub async fn stop(&self) {
        self.handle.stop(true).await;
    }
}

#[derive(Clone)]
struct StubState {
    mode: StubMode,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

/// A blog in the upstream wire shape.
pub fn raw_blog(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": "Body",
        "status": "published",
        "visibility": "public",
        "tags": ["rust"],
        "category": "TECH",
        "created_at": "2025-08-01T09:00:00Z",
        "updated_at": "2025-08-01T09:00:00Z",
        "view_count": 12,
        "like_count": 3,
        "comment_count": 1,
        "share_count": 0
    })
}

async fn answer(
    state: web::Data<StubState>,
    request: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    let seen = SeenRequest {
        method: request.method().to_string(),
        path: request.path().to_owned(),
        query: request.query_string().to_owned(),
        authorization: header("authorization"),
        trace_id: header("trace-id"),
        body: serde_json::from_slice(&body).ok(),
    };
    let payload = seen.body.clone();
    let method = seen.method.clone();
    let path = seen.path.clone();
    state.seen.lock().expect("seen lock").push(seen);

    if let StubMode::Failing(status) = state.mode {
        let status = StatusCode::from_u16(status).expect("valid stub status");
        return HttpResponse::build(status).json(json!({ "detail": "upstream is down" }));
    }

    match (method.as_str(), path.as_str()) {
        ("GET", "/v1/blogs") => HttpResponse::Ok().json(json!({
            "items": [raw_blog(101, "Live post")],
            "pagination": { "page": 1, "perPage": 10, "total": 1, "totalPage": 1 }
        })),
        ("GET", "/v1/blogs/101") => HttpResponse::Ok().json(raw_blog(101, "Live post")),
        ("GET", _) => HttpResponse::NotFound().json(json!({ "detail": "Blog not found" })),
        ("POST", "/v1/auth/login") => {
            let accepted = payload.as_ref().is_some_and(|body| {
                body["username"] == "admin" && body["password"] == "password"
            });
            if accepted {
                HttpResponse::Ok().json(json!({
                    "access_token": "live-token",
                    "token_type": "bearer",
                    "user": { "id": 1, "username": "admin", "is_admin": true }
                }))
            } else {
                HttpResponse::Unauthorized().json(json!({ "detail": "Incorrect username or password" }))
            }
        }
        ("POST", "/v1/blogs") => {
            let mut record = raw_blog(102, "Created");
            if let (Some(record), Some(Value::Object(fields))) = (record.as_object_mut(), payload) {
                record.extend(fields);
            }
            HttpResponse::Created().json(record)
        }
        ("DELETE", _) => HttpResponse::NoContent().finish(),
        _ => HttpResponse::MethodNotAllowed().finish(),
    }
}

/// Start a stub on an ephemeral port. The base URL ends in `/v1`.
pub fn spawn_stub_upstream(mode: StubMode) -> std::io::Result<StubUpstream> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = web::Data::new(StubState {
        mode,
        seen: Arc::clone(&seen),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .default_service(web::to(answer))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok(StubUpstream {
        base_url: format!("http://{addr}/v1"),
        handle,
        seen,
    })
}
