//! Blog post handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Actor, BlogPost, CreateBlogPost, UpdateBlogPost};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Create blog post routes (staff)
pub fn blog_post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
}

/// Create public routes, no authentication
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/brands/:brand_code/blog-posts", get(list_public_posts))
}

/// Publish a blog post
#[utoipa::path(
    post,
    path = "/blog-posts",
    tag = "Blog posts",
    security(("bearer_auth" = [])),
    request_body = CreateBlogPost,
    responses(
        (status = 201, description = "Post created", body = BlogPost),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Brand managers only")
    )
)]
pub async fn create_post(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBlogPost>,
) -> AppResult<(StatusCode, Json<BlogPost>)> {
    let post = state
        .services
        .blog_posts()
        .create_post(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Posts of the caller's brand
#[utoipa::path(
    get,
    path = "/blog-posts",
    tag = "Blog posts",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses((status = 200, description = "Page of posts", body = Vec<BlogPost>))
)]
pub async fn list_posts(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<BlogPost>>> {
    let page = state
        .services
        .blog_posts()
        .list_posts(&actor, params)
        .await?;
    Ok(Json(page))
}

/// Get a blog post
#[utoipa::path(
    get,
    path = "/blog-posts/{id}",
    tag = "Blog posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = BlogPost),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BlogPost>> {
    let post = state.services.blog_posts().get_post(&actor, id).await?;
    Ok(Json(post))
}

/// Update a blog post
#[utoipa::path(
    put,
    path = "/blog-posts/{id}",
    tag = "Blog posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdateBlogPost,
    responses(
        (status = 200, description = "Post updated", body = BlogPost),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn update_post(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateBlogPost>,
) -> AppResult<Json<BlogPost>> {
    let post = state
        .services
        .blog_posts()
        .update_post(&actor, id, payload)
        .await?;
    Ok(Json(post))
}

/// Delete a blog post
#[utoipa::path(
    delete,
    path = "/blog-posts/{id}",
    tag = "Blog posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.blog_posts().delete_post(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Active posts of a brand, for the member app
#[utoipa::path(
    get,
    path = "/public/brands/{brand_code}/blog-posts",
    tag = "Blog posts",
    params(("brand_code" = String, Path, description = "Brand code")),
    responses(
        (status = 200, description = "Active posts, highest priority first", body = Vec<BlogPost>),
        (status = 404, description = "Brand not found")
    )
)]
pub async fn list_public_posts(
    State(state): State<AppState>,
    Path(brand_code): Path<String>,
) -> AppResult<Json<Vec<BlogPost>>> {
    let posts = state.services.blog_posts().list_public(brand_code).await?;
    Ok(Json(posts))
}
