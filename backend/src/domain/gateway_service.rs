//! Gateway use-cases: the read and write policies shared by every resource.
//!
//! Reads prefer the upstream service and fall back to the bundled dataset
//! when upstream is unreachable (transport failure, timeout or 5xx). A 404
//! or any other answered request is relayed as-is. Writes require
//! credentials, validate locally, and always report upstream's verdict; they
//! never touch the fallback dataset.

use std::sync::Arc;

use pagination::{PageRequest, Paginated};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, warn};

use crate::domain::ports::{
    FallbackSource, FallbackSourceError, UpstreamMethod, UpstreamRequest, UpstreamSource,
    UpstreamSourceError,
};
use crate::domain::{
    AuthToken, Error, ListParams, ListQuery, LoginCredentials, LoginSession, QueryTranslator,
    Resource, ResourceId, ResourceKind, require_auth,
};

const AUTH_LOGIN_PATH: &str = "auth/login";

/// Resilient gateway in front of the upstream content service.
#[derive(Clone)]
pub struct GatewayService {
    upstream: Arc<dyn UpstreamSource>,
    fallback: Arc<dyn FallbackSource>,
}

impl GatewayService {
    /// Create a service over the given upstream and fallback ports.
    pub fn new(upstream: Arc<dyn UpstreamSource>, fallback: Arc<dyn FallbackSource>) -> Self {
        Self { upstream, fallback }
    }

    /// List one page of `R`, filtered by `params`.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` for malformed parameters, the mapped
    /// upstream error when upstream answered with a 4xx, and
    /// `service_unavailable` when upstream is unreachable and the fallback
    /// dataset cannot be read.
    pub async fn list<R: Resource>(
        &self,
        params: &ListParams,
        auth: Option<&AuthToken>,
    ) -> Result<Paginated<R>, Error> {
        let query = ListQuery::<R::Category>::parse(params, R::FILTERS)?;
        let request = UpstreamRequest::new(UpstreamMethod::Get, R::KIND.path())
            .with_query(QueryTranslator::encode(&query))
            .with_auth(auth);

        match self.upstream.send(request).await {
            Ok(payload) => decode_list::<R>(payload, query.page()),
            Err(err) if err.is_unreachable() => {
                warn!(
                    resource = %R::KIND,
                    operation = "list",
                    error = %err,
                    "upstream unreachable; serving fallback dataset"
                );
                let records = self.fallback_records::<R>()?;
                Ok(Paginated::from_filtered(
                    records.into_iter().filter(|record| query.matches(record)),
                    query.page(),
                ))
            }
            Err(err) => Err(map_read_error(R::KIND, err)),
        }
    }

    /// Fetch one `R` by id.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when upstream answers 404, or when upstream is
    /// unreachable and the fallback dataset has no record with `id`.
    pub async fn get<R: Resource>(
        &self,
        id: ResourceId,
        auth: Option<&AuthToken>,
    ) -> Result<R, Error> {
        let request = UpstreamRequest::new(UpstreamMethod::Get, item_path(R::KIND, id))
            .with_auth(auth);

        match self.upstream.send(request).await {
            Ok(payload) => decode_record::<R>(payload),
            Err(err) if err.is_unreachable() => {
                warn!(
                    resource = %R::KIND,
                    operation = "get",
                    id = id.get(),
                    error = %err,
                    "upstream unreachable; serving fallback dataset"
                );
                let record = self
                    .fallback
                    .record(R::KIND, id.get())
                    .map_err(|fallback_err| map_fallback_error(R::KIND, &fallback_err))?
                    .ok_or_else(|| not_found(R::KIND, id))?;
                decode_fallback::<R>(record)
            }
            Err(err) => Err(map_read_error(R::KIND, err)),
        }
    }

    /// Validate and forward a create request.
    ///
    /// # Errors
    ///
    /// Returns `unauthorized` without credentials, `invalid_request` for a
    /// malformed or invalid body, and the mapped upstream failure otherwise.
    pub async fn create<R: Resource>(
        &self,
        body: &[u8],
        auth: Option<&AuthToken>,
    ) -> Result<R, Error> {
        let auth = require_auth(auth)?;
        let input: R::Input = decode_body(R::KIND, body)?;
        let draft = R::validate_draft(input)?;
        let request = UpstreamRequest::new(UpstreamMethod::Post, R::KIND.path())
            .with_body(encode_body(&draft)?)
            .with_auth(Some(auth));

        let payload = self.send_write(R::KIND, "create", request).await?;
        decode_record::<R>(payload)
    }

    /// Validate and forward an update request.
    ///
    /// # Errors
    ///
    /// As [`GatewayService::create`], plus `not_found` or `forbidden` when
    /// upstream answers with them.
    pub async fn update<R: Resource>(
        &self,
        id: ResourceId,
        body: &[u8],
        auth: Option<&AuthToken>,
    ) -> Result<R, Error> {
        let auth = require_auth(auth)?;
        let input: R::PatchInput = decode_body(R::KIND, body)?;
        let patch = R::validate_patch(input)?;
        let request = UpstreamRequest::new(UpstreamMethod::Put, item_path(R::KIND, id))
            .with_body(encode_body(&patch)?)
            .with_auth(Some(auth));

        let payload = self.send_write(R::KIND, "update", request).await?;
        decode_record::<R>(payload)
    }

    /// Forward a delete request.
    ///
    /// # Errors
    ///
    /// Returns `unauthorized` without credentials and the mapped upstream
    /// failure otherwise.
    pub async fn delete<R: Resource>(
        &self,
        id: ResourceId,
        auth: Option<&AuthToken>,
    ) -> Result<(), Error> {
        let auth = require_auth(auth)?;
        let request = UpstreamRequest::new(UpstreamMethod::Delete, item_path(R::KIND, id))
            .with_auth(Some(auth));

        self.send_write(R::KIND, "delete", request).await?;
        Ok(())
    }

    /// Exchange credentials for an upstream session.
    ///
    /// # Errors
    ///
    /// Returns `unauthorized` when upstream rejects the credentials,
    /// `service_unavailable` when it cannot be reached, and `internal` for
    /// upstream failures or an unreadable reply.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginSession, Error> {
        let request = UpstreamRequest::new(UpstreamMethod::Post, AUTH_LOGIN_PATH)
            .with_body(credentials.to_body());

        match self.upstream.send(request).await {
            Ok(payload) => serde_json::from_value(payload).map_err(|err| {
                error!(error = %err, "upstream login reply could not be decoded");
                Error::internal("upstream returned an unreadable login payload")
            }),
            Err(err) => {
                error!(operation = "login", error = %err, "upstream login failed");
                Err(map_write_error("auth", err))
            }
        }
    }

    async fn send_write(
        &self,
        kind: ResourceKind,
        operation: &'static str,
        request: UpstreamRequest,
    ) -> Result<Value, Error> {
        self.upstream.send(request).await.map_err(|err| {
            error!(resource = %kind, operation, error = %err, "upstream write failed");
            map_write_error(kind.noun(), err)
        })
    }

    fn fallback_records<R: Resource>(&self) -> Result<Vec<R>, Error> {
        let records = self
            .fallback
            .records(R::KIND)
            .map_err(|err| map_fallback_error(R::KIND, &err))?;
        records.into_iter().map(decode_fallback::<R>).collect()
    }
}

fn decode_fallback<R: Resource>(value: Value) -> Result<R, Error> {
    serde_json::from_value::<R::Raw>(value)
        .map(R::normalize)
        .map_err(|err| {
            error!(resource = %R::KIND, error = %err, "fallback record is malformed");
            Error::internal(format!("fallback {} record is malformed", R::KIND.noun()))
        })
}

fn item_path(kind: ResourceKind, id: ResourceId) -> String {
    format!("{}/{id}", kind.path())
}

fn not_found(kind: ResourceKind, id: ResourceId) -> Error {
    Error::not_found(format!("{} {id} not found", kind.noun()))
}

fn unreadable(kind: ResourceKind, err: &serde_json::Error) -> Error {
    error!(resource = %kind, error = %err, "upstream payload could not be decoded");
    Error::internal(format!("upstream returned an unreadable {} payload", kind.noun()))
}

fn decode_body<T: DeserializeOwned>(kind: ResourceKind, body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|err| {
        Error::invalid_request(format!("invalid {} payload: {err}", kind.noun()))
    })
}

fn encode_body<T: serde::Serialize>(body: &T) -> Result<Value, Error> {
    serde_json::to_value(body)
        .map_err(|err| Error::internal(format!("failed to encode upstream body: {err}")))
}

fn decode_record<R: Resource>(payload: Value) -> Result<R, Error> {
    serde_json::from_value::<R::Raw>(payload)
        .map(R::normalize)
        .map_err(|err| unreadable(R::KIND, &err))
}

/// Upstream may answer a list with the envelope or with a bare array. A bare
/// array is the page upstream already windowed for the forwarded `page` and
/// `perPage`; it is relayed whole with `total` set to its length.
fn decode_list<R: Resource>(payload: Value, request: PageRequest) -> Result<Paginated<R>, Error> {
    match payload {
        Value::Array(records) => {
            Paginated::from_page(records, request).try_map(decode_record::<R>)
        }
        envelope => serde_json::from_value::<Paginated<R::Raw>>(envelope)
            .map(|page| page.map(R::normalize))
            .map_err(|err| unreadable(R::KIND, &err)),
    }
}

fn map_status(status: u16, message: String) -> Error {
    match status {
        401 => Error::unauthorized(message),
        403 => Error::forbidden(message),
        404 => Error::not_found(message),
        400..=499 => Error::invalid_request(message),
        _ => Error::internal(message),
    }
}

fn map_read_error(kind: ResourceKind, err: UpstreamSourceError) -> Error {
    match err {
        UpstreamSourceError::Status { status, message } => map_status(status, message),
        UpstreamSourceError::Decode { message } => {
            error!(resource = %kind, error = %message, "upstream payload could not be decoded");
            Error::internal(format!("upstream returned an unreadable {} payload", kind.noun()))
        }
        UpstreamSourceError::Transport { .. } | UpstreamSourceError::Timeout { .. } => {
            Error::service_unavailable(format!("{} service is unavailable", kind.noun()))
        }
    }
}

fn map_write_error(noun: &str, err: UpstreamSourceError) -> Error {
    match err {
        UpstreamSourceError::Transport { .. } | UpstreamSourceError::Timeout { .. } => {
            Error::service_unavailable(format!("{noun} service is unavailable"))
        }
        UpstreamSourceError::Status { status, message } => map_status(status, message),
        UpstreamSourceError::Decode { .. } => {
            Error::internal(format!("upstream returned an unreadable {noun} payload"))
        }
    }
}

fn map_fallback_error(kind: ResourceKind, err: &FallbackSourceError) -> Error {
    error!(resource = %kind, error = %err, "fallback dataset unavailable");
    Error::service_unavailable(format!("{} service is unavailable", kind.noun()))
}

#[cfg(test)]
#[path = "gateway_service_tests.rs"]
mod tests;
