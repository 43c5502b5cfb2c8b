//! Promotion handlers.

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
use crate::domain::{Actor, CreatePromotion, Promotion, UpdatePromotion};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Create promotion routes
pub fn promotion_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_promotions).post(create_promotion))
        .route("/:id", get(get_promotion).put(update_promotion))
}

/// Create a promotion
#[utoipa::path(
    post,
    path = "/promotions",
    tag = "Promotions",
    security(("bearer_auth" = [])),
    request_body = CreatePromotion,
    responses(
        (status = 201, description = "Promotion created", body = Promotion),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Brand managers only"),
        (status = 409, description = "Promotion code already exists")
    )
)]
pub async fn create_promotion(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePromotion>,
) -> AppResult<(StatusCode, Json<Promotion>)> {
    let promotion = state
        .services
        .promotions()
        .create_promotion(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(promotion)))
}

/// Promotions of the caller's brand
#[utoipa::path(
    get,
    path = "/promotions",
    tag = "Promotions",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses((status = 200, description = "Page of promotions", body = Vec<Promotion>))
)]
pub async fn list_promotions(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Promotion>>> {
    let page = state
        .services
        .promotions()
        .list_promotions(&actor, params)
        .await?;
    Ok(Json(page))
}

/// Get a promotion
#[utoipa::path(
    get,
    path = "/promotions/{id}",
    tag = "Promotions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Promotion ID")),
    responses(
        (status = 200, description = "Promotion", body = Promotion),
        (status = 404, description = "Promotion not found")
    )
)]
pub async fn get_promotion(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Promotion>> {
    let promotion = state
        .services
        .promotions()
        .get_promotion(&actor, id)
        .await?;
    Ok(Json(promotion))
}

/// Update a promotion
#[utoipa::path(
    put,
    path = "/promotions/{id}",
    tag = "Promotions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Promotion ID")),
    request_body = UpdatePromotion,
    responses(
        (status = 200, description = "Promotion updated", body = Promotion),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Promotion not found")
    )
)]
pub async fn update_promotion(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePromotion>,
) -> AppResult<Json<Promotion>> {
    let promotion = state
        .services
        .promotions()
        .update_promotion(&actor, id, payload)
        .await?;
    Ok(Json(promotion))
}
