//! Catalog handlers: products, categories and collections.

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
use crate::domain::{
    Actor, AssignProducts, Category, Collection, CollectionDetail, CreateCategory,
    CreateCollection, CreateProduct, Product, ProductFilter, UpdateCategory, UpdateCollection,
    UpdateProduct,
};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product).put(update_product))
}

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", get(get_category).put(update_category))
}

/// Create collection routes
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_collections).post(create_collection))
        .route("/:id", get(get_collection).put(update_collection))
        .route("/:id/products", put(set_collection_products))
}

// =============================================================================
// Products
// =============================================================================

/// Create a product in the caller's brand
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Brand managers only"),
        (status = 409, description = "Product code already exists")
    )
)]
pub async fn create_product(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state
        .services
        .products()
        .create_product(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Products of the caller's brand
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(PaginationParams, ProductFilter),
    responses(
        (status = 200, description = "Page of products", body = Vec<Product>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_products(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<Paginated<Product>>> {
    let page = state
        .services
        .products()
        .list_products(&actor, filter, params)
        .await?;
    Ok(Json(page))
}

/// Get a product
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let product = state.services.products().get_product(&actor, id).await?;
    Ok(Json(product))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProduct>,
) -> AppResult<Json<Product>> {
    let product = state
        .services
        .products()
        .update_product(&actor, id, payload)
        .await?;
    Ok(Json(product))
}

// =============================================================================
// Categories
// =============================================================================

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Brand managers only"),
        (status = 409, description = "Category code already exists")
    )
)]
pub async fn create_category(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state
        .services
        .products()
        .create_category(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Categories of the caller's brand
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses((status = 200, description = "Page of categories", body = Vec<Category>))
)]
pub async fn list_categories(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Category>>> {
    let page = state
        .services
        .products()
        .list_categories(&actor, params)
        .await?;
    Ok(Json(page))
}

/// Get a category
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    let category = state.services.products().get_category(&actor, id).await?;
    Ok(Json(category))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCategory>,
) -> AppResult<Json<Category>> {
    let category = state
        .services
        .products()
        .update_category(&actor, id, payload)
        .await?;
    Ok(Json(category))
}

// =============================================================================
// Collections
// =============================================================================

/// Create a collection
#[utoipa::path(
    post,
    path = "/collections",
    tag = "Collections",
    security(("bearer_auth" = [])),
    request_body = CreateCollection,
    responses(
        (status = 201, description = "Collection created", body = Collection),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Brand managers only"),
        (status = 409, description = "Collection code already exists")
    )
)]
pub async fn create_collection(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCollection>,
) -> AppResult<(StatusCode, Json<Collection>)> {
    let collection = state
        .services
        .products()
        .create_collection(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

/// Collections of the caller's brand
#[utoipa::path(
    get,
    path = "/collections",
    tag = "Collections",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses((status = 200, description = "Page of collections", body = Vec<Collection>))
)]
pub async fn list_collections(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Collection>>> {
    let page = state
        .services
        .products()
        .list_collections(&actor, params)
        .await?;
    Ok(Json(page))
}

/// Get a collection and its products
#[utoipa::path(
    get,
    path = "/collections/{id}",
    tag = "Collections",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Collection ID")),
    responses(
        (status = 200, description = "Collection", body = CollectionDetail),
        (status = 404, description = "Collection not found")
    )
)]
pub async fn get_collection(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CollectionDetail>> {
    let collection = state.services.products().get_collection(&actor, id).await?;
    Ok(Json(collection))
}

/// Update a collection
#[utoipa::path(
    put,
    path = "/collections/{id}",
    tag = "Collections",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Collection ID")),
    request_body = UpdateCollection,
    responses(
        (status = 200, description = "Collection updated", body = Collection),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Collection not found")
    )
)]
pub async fn update_collection(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCollection>,
) -> AppResult<Json<Collection>> {
    let collection = state
        .services
        .products()
        .update_collection(&actor, id, payload)
        .await?;
    Ok(Json(collection))
}

/// Replace the products of a collection
#[utoipa::path(
    put,
    path = "/collections/{id}/products",
    tag = "Collections",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Collection ID")),
    request_body = AssignProducts,
    responses(
        (status = 200, description = "Collection products replaced", body = CollectionDetail),
        (status = 400, description = "Unknown product or extra product"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Collection not found")
    )
)]
pub async fn set_collection_products(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AssignProducts>,
) -> AppResult<Json<CollectionDetail>> {
    let collection = state
        .services
        .products()
        .set_collection_products(&actor, id, payload)
        .await?;
    Ok(Json(collection))
}
