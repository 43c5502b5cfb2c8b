//! Brand handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::{account_handler, store_handler, transaction_handler, user_handler};
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Actor, Brand, CreateBrand, UpdateBrand};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Case-insensitive name search
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// Create brand routes, including the per-brand listings
pub fn brand_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_brands).post(create_brand))
        .route("/:id", get(get_brand).put(update_brand))
        .route("/:id/stores", get(store_handler::list_brand_stores))
        .route("/:id/accounts", get(account_handler::list_brand_accounts))
        .route("/:id/users", get(user_handler::list_brand_users))
        .route(
            "/:id/transactions",
            get(transaction_handler::list_brand_transactions),
        )
}

/// Create a brand (system admin)
#[utoipa::path(
    post,
    path = "/brands",
    tag = "Brands",
    security(("bearer_auth" = [])),
    request_body = CreateBrand,
    responses(
        (status = 201, description = "Brand created", body = Brand),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - System admin only"),
        (status = 409, description = "Brand code already exists")
    )
)]
pub async fn create_brand(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBrand>,
) -> AppResult<(StatusCode, Json<Brand>)> {
    let brand = state.services.brands().create_brand(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

/// List brands (system admin)
#[utoipa::path(
    get,
    path = "/brands",
    tag = "Brands",
    security(("bearer_auth" = [])),
    params(PaginationParams, NameQuery),
    responses(
        (status = 200, description = "Page of brands", body = Vec<Brand>),
        (status = 403, description = "Forbidden - System admin only")
    )
)]
pub async fn list_brands(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(query): Query<NameQuery>,
) -> AppResult<Json<Paginated<Brand>>> {
    let page = state
        .services
        .brands()
        .list_brands(&actor, query.name, params)
        .await?;
    Ok(Json(page))
}

/// Get a brand
#[utoipa::path(
    get,
    path = "/brands/{id}",
    tag = "Brands",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Brand", body = Brand),
        (status = 403, description = "Forbidden - Another brand"),
        (status = 404, description = "Brand not found")
    )
)]
pub async fn get_brand(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Brand>> {
    let brand = state.services.brands().get_brand(&actor, id).await?;
    Ok(Json(brand))
}

/// Update a brand
#[utoipa::path(
    put,
    path = "/brands/{id}",
    tag = "Brands",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Brand ID")),
    request_body = UpdateBrand,
    responses(
        (status = 200, description = "Brand updated", body = Brand),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Brand not found")
    )
)]
pub async fn update_brand(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateBrand>,
) -> AppResult<Json<Brand>> {
    let brand = state
        .services
        .brands()
        .update_brand(&actor, id, payload)
        .await?;
    Ok(Json(brand))
}
