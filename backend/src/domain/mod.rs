//! Domain primitives, resource records and the gateway use-cases.
//!
//! Purpose: define the strongly typed records the gateway serves, the list
//! and write validation rules, and the read/write policies applied in front
//! of the upstream service. Nothing here knows about HTTP frameworks or
//! clients; adapters reach the outside world through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): gateway error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - GatewayService: list/get/create/update/delete and login use-cases.
//! - Blog, Photo, Contact: normalized resource records.
//! - ListParams, ListQuery, QueryTranslator: list filters and their
//!   upstream encoding.

pub mod auth;
pub mod blog;
pub mod contact;
pub mod content;
pub mod error;
pub mod gateway_service;
pub mod photo;
pub mod ports;
pub mod query;
pub mod resource;
pub mod trace_id;
pub mod validation;

pub use self::auth::{
    AuthToken, AuthenticatedUser, LoginCredentials, LoginSession, LoginValidationError,
    require_auth,
};
pub use self::blog::{Blog, BlogCategory, BlogDraft, BlogInput, RawBlog};
pub use self::contact::{Contact, ContactDraft, ContactInput, ContactPatch, RawContact};
pub use self::content::{ContentStatus, RawCounters, Stats, Visibility};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::gateway_service::GatewayService;
pub use self::photo::{Photo, PhotoCategory, PhotoDraft, PhotoInput, PhotoPatch, RawPhoto};
pub use self::query::{ListParams, ListQuery, NO_FILTER, QueryTranslator, SearchTerm};
pub use self::resource::{
    FilterLiteral, FilterSupport, NoCategory, Resource, ResourceId, ResourceKind,
};
pub use self::trace_id::TraceId;
pub use self::validation::FieldViolation;

/// Convenient result alias for domain operations.
///
/// # Examples
/// ```
/// use gateway::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("blog 9 not found"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
