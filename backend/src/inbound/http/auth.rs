//! Caller credentials and the login proxy.
//!
//! ```text
//! POST /api/v1/auth/login {"username":"admin","password":"password"}
//! ```
//!
//! The gateway never validates tokens itself. [`CallerAuth`] captures the
//! `Authorization` header so the use-cases can forward it upstream and
//! require it on writes.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, post, web};
use futures_util::future::{Ready, ready};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuthToken, Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, LoginSessionSchema};
use crate::inbound::http::state::HttpState;

/// The caller's `Authorization` header, if any.
#[derive(Debug, Clone, Default)]
pub struct CallerAuth(Option<AuthToken>);

impl CallerAuth {
    /// Credentials to forward upstream.
    #[must_use]
    pub fn token(&self) -> Option<&AuthToken> {
        self.0.as_ref()
    }

    fn from_request_head(req: &HttpRequest) -> Result<Self, Error> {
        let Some(value) = req.headers().get(AUTHORIZATION) else {
            return Ok(Self(None));
        };
        let value = value
            .to_str()
            .map_err(|_| Error::unauthorized("Authorization header must be visible ASCII"))?;
        Ok(Self(AuthToken::from_header(value)))
    }
}

impl FromRequest for CallerAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_head(req))
    }
}

/// Login request body for `POST /api/v1/auth/login`.
///
/// Example JSON:
/// `{"username":"admin","password":"password"}`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Exchange credentials for an upstream access token.
///
/// Failures are never masked: an unreachable upstream is a 503.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginSessionSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Upstream unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(state: web::Data<HttpState>, payload: web::Bytes) -> ApiResult<HttpResponse> {
    let request: LoginRequest = serde_json::from_slice(&payload)
        .map_err(|err| Error::invalid_request(format!("invalid login payload: {err}")))?;
    let credentials = LoginCredentials::try_from(request)?;
    let session = state.gateway.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(session))
}
