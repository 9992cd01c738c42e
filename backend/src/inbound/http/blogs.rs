//! Blog gateway routes.
//!
//! ```text
//! GET    /api/v1/blogs?page=&perPage=&search=&category=&status=
//! GET    /api/v1/blogs/{id}
//! POST   /api/v1/blogs
//! PUT    /api/v1/blogs/{id}
//! DELETE /api/v1/blogs/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};

use crate::domain::Blog;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CallerAuth;
use crate::inbound::http::resources::{self, ListQueryDoc};
use crate::inbound::http::schemas::{
    BlogInputSchema, BlogPageSchema, BlogSchema, DeletedSchema, ErrorSchema,
};
use crate::inbound::http::state::HttpState;

/// Register the blog routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_blogs)
        .service(get_blog)
        .service(create_blog)
        .service(update_blog)
        .service(delete_blog);
}

/// List blogs.
///
/// Served from the fallback dataset when upstream is unreachable.
#[utoipa::path(
    get,
    path = "/api/v1/blogs",
    params(ListQueryDoc),
    responses(
        (status = 200, description = "One page of blogs", body = BlogPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Upstream and fallback unavailable", body = ErrorSchema)
    ),
    tags = ["blogs"],
    operation_id = "listBlogs",
    security((), ("BearerAuth" = []))
)]
#[get("/blogs")]
pub async fn list_blogs(
    state: web::Data<HttpState>,
    request: HttpRequest,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::list::<Blog>(&state, &request, &auth).await
}

/// Fetch one blog.
#[utoipa::path(
    get,
    path = "/api/v1/blogs/{id}",
    params(("id" = i64, Path, description = "Blog id")),
    responses(
        (status = 200, description = "The blog", body = BlogSchema),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["blogs"],
    operation_id = "getBlog",
    security((), ("BearerAuth" = []))
)]
#[get("/blogs/{id}")]
pub async fn get_blog(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::get::<Blog>(&state, &path, &auth).await
}

/// Create a blog.
#[utoipa::path(
    post,
    path = "/api/v1/blogs",
    request_body = BlogInputSchema,
    responses(
        (status = 201, description = "Created", body = BlogSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Upstream failed", body = ErrorSchema),
        (status = 503, description = "Upstream unavailable", body = ErrorSchema)
    ),
    tags = ["blogs"],
    operation_id = "createBlog"
)]
#[post("/blogs")]
pub async fn create_blog(
    state: web::Data<HttpState>,
    body: web::Bytes,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::create::<Blog>(&state, &body, &auth).await
}

/// Replace a blog.
#[utoipa::path(
    put,
    path = "/api/v1/blogs/{id}",
    params(("id" = i64, Path, description = "Blog id")),
    request_body = BlogInputSchema,
    responses(
        (status = 200, description = "Updated", body = BlogSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Upstream failed", body = ErrorSchema),
        (status = 503, description = "Upstream unavailable", body = ErrorSchema)
    ),
    tags = ["blogs"],
    operation_id = "updateBlog"
)]
#[put("/blogs/{id}")]
pub async fn update_blog(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::update::<Blog>(&state, &path, &body, &auth).await
}

/// Delete a blog.
#[utoipa::path(
    delete,
    path = "/api/v1/blogs/{id}",
    params(("id" = i64, Path, description = "Blog id")),
    responses(
        (status = 200, description = "Deleted", body = DeletedSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Upstream failed", body = ErrorSchema),
        (status = 503, description = "Upstream unavailable", body = ErrorSchema)
    ),
    tags = ["blogs"],
    operation_id = "deleteBlog"
)]
#[delete("/blogs/{id}")]
pub async fn delete_blog(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    auth: CallerAuth,
) -> ApiResult<HttpResponse> {
    resources::delete::<Blog>(&state, &path, &auth).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockUpstreamSource, UpstreamSourceError};
    use crate::inbound::http::test_utils::{read_json, state_with_upstream};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::json;

    async fn call(
        upstream: MockUpstreamSource,
        request: actix_test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new()
                .app_data(state_with_upstream(upstream))
                .service(web::scope("/api/v1").configure(configure)),
        )
        .await;
        actix_test::call_service(&app, request.to_request()).await
    }

    #[actix_web::test]
    async fn lists_fall_back_to_the_bundled_dataset() {
        let mut upstream = MockUpstreamSource::new();
        upstream
            .expect_send()
            .times(1)
            .return_once(|_| Err(UpstreamSourceError::transport("connection refused")));

        let response = call(
            upstream,
            actix_test::TestRequest::get().uri("/api/v1/blogs?category=TECH&status=published&perPage=1"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["pagination"]["total"], 2);
        assert_eq!(body["pagination"]["totalPage"], 2);
        assert_eq!(body["pagination"]["perPage"], 1);
        assert_eq!(body["items"][0]["id"], 23);
        assert!(body["items"][0]["stats"].is_object());
    }

    #[actix_web::test]
    async fn upstream_not_found_is_relayed() {
        let mut upstream = MockUpstreamSource::new();
        upstream
            .expect_send()
            .times(1)
            .return_once(|_| Err(UpstreamSourceError::status(404_u16, "Blog not found")));

        let response = call(upstream, actix_test::TestRequest::get().uri("/api/v1/blogs/24")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Blog not found");
        assert_eq!(body["code"], "not_found");
    }

    #[rstest]
    #[case::zero("/api/v1/blogs/0")]
    #[case::text("/api/v1/blogs/latest")]
    #[actix_web::test]
    async fn malformed_ids_are_rejected_locally(#[case] uri: &str) {
        let mut upstream = MockUpstreamSource::new();
        upstream.expect_send().times(0);

        let response = call(upstream, actix_test::TestRequest::get().uri(uri)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case::create(actix_test::TestRequest::post().uri("/api/v1/blogs").set_payload("{}"))]
    #[case::update(actix_test::TestRequest::put().uri("/api/v1/blogs/x").set_payload("{}"))]
    #[case::delete(actix_test::TestRequest::delete().uri("/api/v1/blogs/3"))]
    #[actix_web::test]
    async fn writes_without_credentials_are_unauthorised(#[case] request: actix_test::TestRequest) {
        let mut upstream = MockUpstreamSource::new();
        upstream.expect_send().times(0);

        let response = call(upstream, request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(response).await;
        assert_eq!(body["code"], "unauthorized");
    }

    #[actix_web::test]
    async fn creates_return_201_with_the_normalized_record() {
        let mut upstream = MockUpstreamSource::new();
        upstream
            .expect_send()
            .withf(|request| {
                request
                    .auth
                    .as_ref()
                    .is_some_and(|auth| auth.as_header_value() == "Bearer t1")
            })
            .times(1)
            .return_once(|_| {
                Ok(json!({
                    "id": 40,
                    "title": "New",
                    "content": "Body",
                    "category": "TECH",
                    "view_count": 0
                }))
            });

        let response = call(
            upstream,
            actix_test::TestRequest::post()
                .uri("/api/v1/blogs")
                .insert_header(("Authorization", "Bearer t1"))
                .set_json(json!({ "title": "New", "content": "Body", "category": "TECH" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["id"], 40);
        assert_eq!(body["tags"], json!([]));
        assert_eq!(body["stats"]["views"], 0);
    }

    #[actix_web::test]
    async fn failed_deletes_are_never_masked() {
        let mut upstream = MockUpstreamSource::new();
        upstream
            .expect_send()
            .times(1)
            .return_once(|_| Err(UpstreamSourceError::timeout("deadline elapsed")));

        let response = call(
            upstream,
            actix_test::TestRequest::delete()
                .uri("/api/v1/blogs/3")
                .insert_header(("Authorization", "Bearer t1")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
