//! Member handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use super::transaction_handler;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Actor, TopUp, UpdateUser, UserFilter, UserResponse};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Create member routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/:id", get(get_user).put(update_user))
        .route("/:id/top-up", post(top_up))
        .route(
            "/:id/transactions",
            get(transaction_handler::list_user_transactions),
        )
}

/// Profile of the calling member
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current member profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Members only")
    )
)]
pub async fn get_current_user(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().get_user(&actor, actor.id).await?;
    Ok(Json(user))
}

/// Get a member (the member itself or brand staff)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member profile", body = UserResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_user(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().get_user(&actor, id).await?;
    Ok(Json(user))
}

/// Update a member profile
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Member ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Member updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_user(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users()
        .update_user(&actor, id, payload)
        .await?;
    Ok(Json(user))
}

/// Credit a member's wallet
#[utoipa::path(
    post,
    path = "/users/{id}/top-up",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Member ID")),
    request_body = TopUp,
    responses(
        (status = 200, description = "Wallet credited", body = UserResponse),
        (status = 400, description = "Amount must be positive"),
        (status = 403, description = "Forbidden - Store operators only"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn top_up(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<TopUp>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().top_up(&actor, id, payload).await?;
    Ok(Json(user))
}

/// Members of a brand
#[utoipa::path(
    get,
    path = "/brands/{id}/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Brand ID"), PaginationParams, UserFilter),
    responses(
        (status = 200, description = "Page of members", body = Vec<UserResponse>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_brand_users(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(brand_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<UserFilter>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let page = state
        .services
        .users()
        .list_brand_users(&actor, brand_id, filter, params)
        .await?;
    Ok(Json(page))
}
