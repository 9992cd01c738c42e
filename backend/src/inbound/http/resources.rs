//! Request mapping shared by the blog, photo and contact routes.
//!
//! Each resource module declares its own documented handlers and delegates
//! here; the gateway policy itself lives in [`crate::domain::GatewayService`].
//! Writes check credentials before the path id so a caller without them
//! always sees 401.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{Error, ListParams, Resource, ResourceId, require_auth};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CallerAuth;
use crate::inbound::http::state::HttpState;

/// List query parameters, documented for OpenAPI.
///
/// `all` or a blank value disables a filter.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI parameter generation via utoipa"
)]
pub struct ListQueryDoc {
    /// 1-based page number; defaults to 1.
    page: Option<u32>,
    /// Page size between 1 and 100; defaults to 10.
    #[serde(rename = "perPage")]
    per_page: Option<u32>,
    /// Case-insensitive free-text search.
    search: Option<String>,
    /// Category literal, or `all`. Not accepted for contacts.
    category: Option<String>,
    /// Status literal, or `all`. Not accepted for contacts.
    status: Option<String>,
}

fn list_params(request: &HttpRequest) -> Result<ListParams, Error> {
    web::Query::<ListParams>::from_query(request.query_string())
        .map(web::Query::into_inner)
        .map_err(|err| Error::invalid_request(format!("invalid query string: {err}")))
}

pub(crate) async fn list<R: Resource>(
    state: &HttpState,
    request: &HttpRequest,
    auth: &CallerAuth,
) -> ApiResult<HttpResponse> {
    let params = list_params(request)?;
    let page = state.gateway.list::<R>(&params, auth.token()).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub(crate) async fn get<R: Resource>(
    state: &HttpState,
    id: &str,
    auth: &CallerAuth,
) -> ApiResult<HttpResponse> {
    let id = ResourceId::parse(id)?;
    let record = state.gateway.get::<R>(id, auth.token()).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub(crate) async fn create<R: Resource>(
    state: &HttpState,
    body: &[u8],
    auth: &CallerAuth,
) -> ApiResult<HttpResponse> {
    let record = state.gateway.create::<R>(body, auth.token()).await?;
    Ok(HttpResponse::Created().json(record))
}

pub(crate) async fn update<R: Resource>(
    state: &HttpState,
    id: &str,
    body: &[u8],
    auth: &CallerAuth,
) -> ApiResult<HttpResponse> {
    require_auth(auth.token())?;
    let id = ResourceId::parse(id)?;
    let record = state.gateway.update::<R>(id, body, auth.token()).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub(crate) async fn delete<R: Resource>(
    state: &HttpState,
    id: &str,
    auth: &CallerAuth,
) -> ApiResult<HttpResponse> {
    require_auth(auth.token())?;
    let id = ResourceId::parse(id)?;
    state.gateway.delete::<R>(id, auth.token()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "deleted" })))
}
