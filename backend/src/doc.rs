//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every gateway endpoint, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the bearer security scheme. The
//! document is served by Swagger UI in debug builds and exported via
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::schemas::{
    AuthenticatedUserSchema, BlogInputSchema, BlogPageSchema, BlogSchema, ContactInputSchema,
    ContactPageSchema, ContactSchema, DeletedSchema, ErrorCodeSchema, ErrorSchema,
    LoginSessionSchema, PaginationSchema, PhotoInputSchema, PhotoPageSchema, PhotoSchema,
    StatsSchema,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Access token issued by POST /api/v1/auth/login, forwarded upstream.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the gateway.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bluenote gateway API",
        description = "Blog, photo and contact endpoints proxied to the content service, \
                       with read fallback when it is unreachable.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::blogs::list_blogs,
        crate::inbound::http::blogs::get_blog,
        crate::inbound::http::blogs::create_blog,
        crate::inbound::http::blogs::update_blog,
        crate::inbound::http::blogs::delete_blog,
        crate::inbound::http::photos::list_photos,
        crate::inbound::http::photos::get_photo,
        crate::inbound::http::photos::create_photo,
        crate::inbound::http::photos::update_photo,
        crate::inbound::http::photos::delete_photo,
        crate::inbound::http::contacts::list_contacts,
        crate::inbound::http::contacts::get_contact,
        crate::inbound::http::contacts::create_contact,
        crate::inbound::http::contacts::update_contact,
        crate::inbound::http::contacts::delete_contact,
        crate::inbound::http::auth::login,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        StatsSchema,
        PaginationSchema,
        BlogSchema,
        BlogPageSchema,
        BlogInputSchema,
        PhotoSchema,
        PhotoPageSchema,
        PhotoInputSchema,
        ContactSchema,
        ContactPageSchema,
        ContactInputSchema,
        AuthenticatedUserSchema,
        LoginSessionSchema,
        LoginRequest,
        DeletedSchema,
    )),
    tags(
        (name = "blogs", description = "Blog posts"),
        (name = "photos", description = "Photo gallery"),
        (name = "contacts", description = "Contact form submissions"),
        (name = "auth", description = "Login proxy"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
