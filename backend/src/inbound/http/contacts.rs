//! Contact gateway routes.
//!
//! ```text
//! GET    /api/v1/contacts?page=&perPage=&search=
//! GET    /api/v1/contacts/{id}
//! POST   /api/v1/contacts
//! PUT    /api/v1/contacts/{id}
//! DELETE /api/v1/contacts/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};

use crate::domain::Contact;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CallerAuth;
use crate::inbound::http::resources::{self, ListQueryDoc};
use crate::inbound::http::schemas::{
    ContactInputSchema, ContactPageSchema, ContactSchema, DeletedSchema, ErrorSchema,
};
use crate::inbound::http::state::HttpState;

/// Register the contact routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_contacts)
        .service(get_contact)
        .service(create_contact)
        .service(update_contact)
        .service(delete_contact);
}

/// List contacts.
///
/// Served from the fallback dataset when upstream is unreachable.
#[utoipa::path(
    get,
    path = "/api/v1/contacts",
    params(ListQueryDoc),
    responses(
        (status = 200, description = "One page of contacts", body = ContactPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Upstream and fallback unavailable", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "listContacts",
    security((), ("BearerAuth" = []))
)]
#[get("/contacts")]
pub async fn list_contacts(
    state: web::Data<HttpState>,
    request: HttpRequest,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::list::<Contact>(&state, &request, &auth).await
}

/// Fetch one contact.
#[utoipa::path(
    get,
    path = "/api/v1/contacts/{id}",
    params(("id" = i64, Path, description = "Contact id")),
    responses(
        (status = 200, description = "The contact", body = ContactSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "getContact",
    security((), ("BearerAuth" = []))
)]
#[get("/contacts/{id}")]
pub async fn get_contact(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::get::<Contact>(&state, &path, &auth).await
}

/// Create a contact.
#[utoipa::path(
    post,
    path = "/api/v1/contacts",
    request_body = ContactInputSchema,
    responses(
        (status = 201, description = "Created", body = ContactSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Upstream failed", body = ErrorSchema),
        (status = 503, description = "Upstream unavailable", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "createContact"
)]
#[post("/contacts")]
pub async fn create_contact(
    state: web::Data<HttpState>,
    body: web::Bytes,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::create::<Contact>(&state, &body, &auth).await
}

/// Update a contact.
///
/// Only fields present in the body are changed.
#[utoipa::path(
    put,
    path = "/api/v1/contacts/{id}",
    params(("id" = i64, Path, description = "Contact id")),
    request_body = ContactInputSchema,
    responses(
        (status = 200, description = "Updated", body = ContactSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Upstream failed", body = ErrorSchema),
        (status = 503, description = "Upstream unavailable", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "updateContact"
)]
#[put("/contacts/{id}")]
pub async fn update_contact(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::update::<Contact>(&state, &path, &body, &auth).await
}

/// Delete a contact.
#[utoipa::path(
    delete,
    path = "/api/v1/contacts/{id}",
    params(("id" = i64, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Deleted", body = DeletedSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Upstream failed", body = ErrorSchema),
        (status = 503, description = "Upstream unavailable", body = ErrorSchema)
    ),
    tags = ["contacts"],
    operation_id = "deleteContact"
)]
#[delete("/contacts/{id}")]
pub async fn delete_contact(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::delete::<Contact>(&state, &path, &auth).await
}
