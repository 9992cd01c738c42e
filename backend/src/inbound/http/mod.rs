//! HTTP inbound adapter exposing the gateway's REST endpoints.

use actix_web::web;

pub mod auth;
pub mod blogs;
pub mod contacts;
pub mod error;
pub mod health;
pub mod photos;
pub(crate) mod resources;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

/// Register every `/api/v1` route: the three resources and the login proxy.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
///
/// let _app = App::new()
///     .service(web::scope("/api/v1").configure(gateway::inbound::http::configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(blogs::configure)
        .configure(photos::configure)
        .configure(contacts::configure)
        .service(auth::login);
}
