//! Menu handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    Actor, ApplyMenuStores, CreateMenu, Menu, MenuDetail, MenuProduct, UpdateMenu,
    UpsertMenuProducts,
};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Create menu routes
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menus).post(create_menu))
        .route("/:id", get(get_menu).put(update_menu))
        .route(
            "/:id/products",
            get(list_menu_products).put(upsert_menu_products),
        )
        .route("/:id/products/:product_id", delete(remove_menu_product))
        .route("/:id/stores", post(apply_menu_to_stores))
}

/// Create a menu
#[utoipa::path(
    post,
    path = "/menus",
    tag = "Menus",
    security(("bearer_auth" = [])),
    request_body = CreateMenu,
    responses(
        (status = 201, description = "Menu created", body = Menu),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Brand managers only"),
        (status = 409, description = "Menu code or base menu already exists")
    )
)]
pub async fn create_menu(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateMenu>,
) -> AppResult<(StatusCode, Json<Menu>)> {
    let menu = state.services.menus().create_menu(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(menu)))
}

/// Menus of the caller's brand
#[utoipa::path(
    get,
    path = "/menus",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses((status = 200, description = "Page of menus", body = Vec<Menu>))
)]
pub async fn list_menus(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Menu>>> {
    let page = state.services.menus().list_menus(&actor, params).await?;
    Ok(Json(page))
}

/// Get a menu
#[utoipa::path(
    get,
    path = "/menus/{id}",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu", body = Menu),
        (status = 404, description = "Menu not found")
    )
)]
pub async fn get_menu(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Menu>> {
    let menu = state.services.menus().get_menu(&actor, id).await?;
    Ok(Json(menu))
}

/// Update a menu
#[utoipa::path(
    put,
    path = "/menus/{id}",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Menu ID")),
    request_body = UpdateMenu,
    responses(
        (status = 200, description = "Menu updated", body = Menu),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Menu not found")
    )
)]
pub async fn update_menu(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateMenu>,
) -> AppResult<Json<Menu>> {
    let menu = state
        .services
        .menus()
        .update_menu(&actor, id, payload)
        .await?;
    Ok(Json(menu))
}

/// Products listed on a menu
#[utoipa::path(
    get,
    path = "/menus/{id}/products",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu products", body = Vec<MenuProduct>),
        (status = 404, description = "Menu not found")
    )
)]
pub async fn list_menu_products(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<MenuProduct>>> {
    let products = state
        .services
        .menus()
        .list_menu_products(&actor, id)
        .await?;
    Ok(Json(products))
}

/// List products on a menu or re-price them
#[utoipa::path(
    put,
    path = "/menus/{id}/products",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Menu ID")),
    request_body = UpsertMenuProducts,
    responses(
        (status = 200, description = "Menu products after the change", body = Vec<MenuProduct>),
        (status = 400, description = "Duplicate or unknown product, invalid price"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Menu not found")
    )
)]
pub async fn upsert_menu_products(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpsertMenuProducts>,
) -> AppResult<Json<Vec<MenuProduct>>> {
    let products = state
        .services
        .menus()
        .upsert_menu_products(&actor, id, payload)
        .await?;
    Ok(Json(products))
}

/// Take a product off a menu
#[utoipa::path(
    delete,
    path = "/menus/{id}/products/{product_id}",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Menu ID"),
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product removed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Menu or product not found")
    )
)]
pub async fn remove_menu_product(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path((id, product_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    state
        .services
        .menus()
        .remove_menu_product(&actor, id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Make stores sell a menu
#[utoipa::path(
    post,
    path = "/menus/{id}/stores",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Menu ID")),
    request_body = ApplyMenuStores,
    responses(
        (status = 204, description = "Menu applied"),
        (status = 400, description = "Unknown store"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Menu not found")
    )
)]
pub async fn apply_menu_to_stores(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ApplyMenuStores>,
) -> AppResult<StatusCode> {
    state
        .services
        .menus()
        .apply_menu_to_stores(&actor, id, payload)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// What a store sells right now
#[utoipa::path(
    get,
    path = "/stores/{id}/menu",
    tag = "Menus",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Resolved menu", body = MenuDetail),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No menu for this store right now")
    )
)]
pub async fn get_store_menu(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
) -> AppResult<Json<MenuDetail>> {
    let menu = state
        .services
        .menus()
        .get_menu_detail_from_store(&actor, store_id, Utc::now())
        .await?;
    Ok(Json(menu))
}
