//! Resilient REST gateway for the blog, photo and contact services.
//!
//! Reads are proxied upstream and served from a bundled fallback dataset
//! when upstream is unreachable; writes are proxied and never masked.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
