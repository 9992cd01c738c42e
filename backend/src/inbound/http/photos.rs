//! Photo gateway routes.
//!
//! ```text
//! GET    /api/v1/photos?page=&perPage=&search=&category=&status=
//! GET    /api/v1/photos/{id}
//! POST   /api/v1/photos
//! PUT    /api/v1/photos/{id}
//! DELETE /api/v1/photos/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};

use crate::domain::Photo;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CallerAuth;
use crate::inbound::http::resources::{self, ListQueryDoc};
use crate::inbound::http::schemas::{
    PhotoInputSchema, PhotoPageSchema, PhotoSchema, DeletedSchema, ErrorSchema,
};
use crate::inbound::http::state::HttpState;

/// Register the photo routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_photos)
        .service(get_photo)
        .service(create_photo)
        .service(update_photo)
        .service(delete_photo);
}

/// List photos.
///
/// Served from the fallback dataset when upstream is unreachable.
#[utoipa::path(
    get,
    path = "/api/v1/photos",
    params(ListQueryDoc),
    responses(
        (status = 200, description = "One page of photos", body = PhotoPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Upstream and fallback unavailable", body = ErrorSchema)
    ),
    tags = ["photos"],
    operation_id = "listPhotos",
    security((), ("BearerAuth" = []))
)]
#[get("/photos")]
pub async fn list_photos(
    state: web::Data<HttpState>,
    request: HttpRequest,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::list::<Photo>(&state, &request, &auth).await
}

/// Fetch one photo.
#[utoipa::path(
    get,
    path = "/api/v1/photos/{id}",
    params(("id" = i64, Path, description = "Photo id")),
    responses(
        (status = 200, description = "The photo", body = PhotoSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["photos"],
    operation_id = "getPhoto",
    security((), ("BearerAuth" = []))
)]
#[get("/photos/{id}")]
pub async fn get_photo(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::get::<Photo>(&state, &path, &auth).await
}

/// Create a photo.
#[utoipa::path(
    post,
    path = "/api/v1/photos",
    request_body = PhotoInputSchema,
    responses(
        (status = 201, description = "Created", body = PhotoSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Upstream failed", body = ErrorSchema),
        (status = 503, description = "Upstream unavailable", body = ErrorSchema)
    ),
    tags = ["photos"],
    operation_id = "createPhoto"
)]
#[post("/photos")]
pub async fn create_photo(
    state: web::Data<HttpState>,
    body: web::Bytes,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::create::<Photo>(&state, &body, &auth).await
}

/// Update a photo.
///
/// Only fields present in the body are changed.
#[utoipa::path(
    put,
    path = "/api/v1/photos/{id}",
    params(("id" = i64, Path, description = "Photo id")),
    request_body = PhotoInputSchema,
    responses(
        (status = 200, description = "Updated", body = PhotoSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Upstream failed", body = ErrorSchema),
        (status = 503, description = "Upstream unavailable", body = ErrorSchema)
    ),
    tags = ["photos"],
    operation_id = "updatePhoto"
)]
#[put("/photos/{id}")]
pub async fn update_photo(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::update::<Photo>(&state, &path, &body, &auth).await
}

/// Delete a photo.
#[utoipa::path(
    delete,
    path = "/api/v1/photos/{id}",
    params(("id" = i64, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Deleted", body = DeletedSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Upstream failed", body = ErrorSchema),
        (status = 503, description = "Upstream unavailable", body = ErrorSchema)
    ),
    tags = ["photos"],
    operation_id = "deletePhoto"
)]
#[delete("/photos/{id}")]
pub async fn delete_photo(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::delete::<Photo>(&state, &path, &auth).await
}
