//! Variant handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Actor, AssignProducts, CreateVariant, UpdateVariant, Variant, VariantDetail};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Create variant routes
pub fn variant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_variants).post(create_variant))
        .route("/:id", get(get_variant).put(update_variant))
        .route("/:id/products", put(assign_variant_products))
}

/// Create a variant (size, topping group...)
#[utoipa::path(
    post,
    path = "/variants",
    tag = "Variants",
    security(("bearer_auth" = [])),
    request_body = CreateVariant,
    responses(
        (status = 201, description = "Variant created", body = Variant),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Brand managers only")
    )
)]
pub async fn create_variant(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateVariant>,
) -> AppResult<(StatusCode, Json<Variant>)> {
    let variant = state
        .services
        .variants()
        .create_variant(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

/// Variants of the caller's brand
#[utoipa::path(
    get,
    path = "/variants",
    tag = "Variants",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses((status = 200, description = "Page of variants", body = Vec<Variant>))
)]
pub async fn list_variants(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Variant>>> {
    let page = state
        .services
        .variants()
        .list_variants(&actor, params)
        .await?;
    Ok(Json(page))
}

/// Get a variant and the products offering it
#[utoipa::path(
    get,
    path = "/variants/{id}",
    tag = "Variants",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Variant ID")),
    responses(
        (status = 200, description = "Variant", body = VariantDetail),
        (status = 404, description = "Variant not found")
    )
)]
pub async fn get_variant(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VariantDetail>> {
    let variant = state.services.variants().get_variant(&actor, id).await?;
    Ok(Json(variant))
}

/// Update a variant
#[utoipa::path(
    put,
    path = "/variants/{id}",
    tag = "Variants",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Variant ID")),
    request_body = UpdateVariant,
    responses(
        (status = 200, description = "Variant updated", body = Variant),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Variant not found")
    )
)]
pub async fn update_variant(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateVariant>,
) -> AppResult<Json<Variant>> {
    let variant = state
        .services
        .variants()
        .update_variant(&actor, id, payload)
        .await?;
    Ok(Json(variant))
}

/// Replace the products offering a variant
#[utoipa::path(
    put,
    path = "/variants/{id}/products",
    tag = "Variants",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Variant ID")),
    request_body = AssignProducts,
    responses(
        (status = 200, description = "Variant products replaced", body = VariantDetail),
        (status = 400, description = "Unknown product"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Variant not found")
    )
)]
pub async fn assign_variant_products(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AssignProducts>,
) -> AppResult<Json<VariantDetail>> {
    let variant = state
        .services
        .variants()
        .assign_variant_products(&actor, id, payload)
        .await?;
    Ok(Json(variant))
}
