//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their corresponding
//! domain types but live in the inbound adapter layer where framework
//! concerns belong.

#![expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The upstream service could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred in the gateway or upstream.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
pub struct ErrorSchema {
    /// Human-readable message.
    #[schema(example = "title must not be empty")]
    error: String,
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Request trace identifier, echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Stats`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Stats)]
pub struct StatsSchema {
    views: u64,
    likes: u64,
    comments: u64,
    shares: u64,
}

/// OpenAPI schema for [`pagination::Pagination`].
#[derive(ToSchema)]
#[schema(as = pagination::Pagination)]
pub struct PaginationSchema {
    /// 1-based page number.
    #[schema(example = 1)]
    page: u32,
    /// Items per page.
    #[schema(rename = "perPage", example = 10)]
    per_page: u32,
    /// Items matching the filters across all pages.
    #[schema(example = 42)]
    total: u64,
    /// `ceil(total / perPage)`.
    #[schema(rename = "totalPage", example = 5)]
    total_page: u64,
}

/// OpenAPI schema for [`crate::domain::Blog`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Blog)]
pub struct BlogSchema {
    id: i64,
    title: String,
    /// Markdown body.
    content: String,
    summary: Option<String>,
    #[schema(example = "published")]
    status: String,
    #[schema(example = "public")]
    visibility: String,
    tags: Vec<String>,
    #[schema(example = "TECH")]
    category: Option<String>,
    created_at: String,
    updated_at: String,
    stats: StatsSchema,
}

/// OpenAPI schema for [`crate::domain::Photo`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Photo)]
pub struct PhotoSchema {
    id: i64,
    title: Option<String>,
    description: Option<String>,
    url_list: Vec<String>,
    location_name: Option<String>,
    #[schema(example = "published")]
    status: String,
    #[schema(example = "public")]
    visibility: String,
    tags: Vec<String>,
    #[schema(example = "LANDSCAPE")]
    category: Option<String>,
    taken_at: Option<String>,
    created_at: String,
    updated_at: String,
    stats: StatsSchema,
}

/// OpenAPI schema for [`crate::domain::Contact`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Contact)]
pub struct ContactSchema {
    id: i64,
    name: String,
    email: String,
    theme: String,
    context: String,
    created_at: String,
}

/// One page of blogs.
#[derive(ToSchema)]
pub struct BlogPageSchema {
    items: Vec<BlogSchema>,
    pagination: PaginationSchema,
}

/// One page of photos.
#[derive(ToSchema)]
pub struct PhotoPageSchema {
    items: Vec<PhotoSchema>,
    pagination: PaginationSchema,
}

/// One page of contacts.
#[derive(ToSchema)]
pub struct ContactPageSchema {
    items: Vec<ContactSchema>,
    pagination: PaginationSchema,
}

/// OpenAPI schema for [`crate::domain::BlogInput`].
///
/// Creates and updates both replace the whole post.
#[derive(ToSchema)]
#[schema(as = crate::domain::BlogInput)]
pub struct BlogInputSchema {
    title: String,
    content: String,
    /// At most 500 characters.
    summary: Option<String>,
    #[schema(example = "draft")]
    status: Option<String>,
    #[schema(example = "public")]
    visibility: Option<String>,
    tags: Option<Vec<String>>,
    #[schema(example = "TECH")]
    category: String,
}

/// OpenAPI schema for [`crate::domain::PhotoInput`].
///
/// `url_list` is required on create; updates send only changed fields.
#[derive(ToSchema)]
#[schema(as = crate::domain::PhotoInput)]
pub struct PhotoInputSchema {
    /// At most 100 characters.
    title: Option<String>,
    description: Option<String>,
    url_list: Option<Vec<String>>,
    /// At most 200 characters.
    location_name: Option<String>,
    status: Option<String>,
    visibility: Option<String>,
    tags: Option<Vec<String>>,
    #[schema(example = "DAILY")]
    category: Option<String>,
    taken_at: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ContactInput`].
///
/// Every field is required on create; updates send only changed fields.
#[derive(ToSchema)]
#[schema(as = crate::domain::ContactInput)]
pub struct ContactInputSchema {
    name: Option<String>,
    #[schema(example = "reader@example.com")]
    email: Option<String>,
    theme: Option<String>,
    context: Option<String>,
}

/// OpenAPI schema for [`crate::domain::AuthenticatedUser`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AuthenticatedUser)]
pub struct AuthenticatedUserSchema {
    id: i64,
    username: String,
    full_name: Option<String>,
    is_admin: bool,
    require_password_change: bool,
    created_at: String,
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::LoginSession`].
#[derive(ToSchema)]
#[schema(as = crate::domain::LoginSession)]
pub struct LoginSessionSchema {
    access_token: String,
    #[schema(example = "bearer")]
    token_type: String,
    user: AuthenticatedUserSchema,
}

/// Success marker returned by deletes.
#[derive(ToSchema)]
pub struct DeletedSchema {
    #[schema(example = "deleted")]
    message: String,
}
