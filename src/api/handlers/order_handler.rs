//! Order handlers: checkout, status changes and store reports.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    Actor, CreateOrder, Order, OrderFilter, OrderWithDetails, ReportRange, StoreReport,
    UpdateOrder,
};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Create order routes
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/:id", get(get_order).put(update_order))
}

/// Place an order in the store's open session
#[utoipa::path(
    post,
    path = "/stores/{id}/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order placed", body = OrderWithDetails),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Another store"),
        (status = 404, description = "Store or menu not found"),
        (status = 422, description = "No open session, product off menu or promotion not applicable")
    )
)]
pub async fn create_order(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateOrder>,
) -> AppResult<(StatusCode, Json<OrderWithDetails>)> {
    let order = state
        .services
        .orders()
        .create_order(&actor, store_id, payload, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Orders of a store, latest first
#[utoipa::path(
    get,
    path = "/stores/{id}/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID"), PaginationParams, OrderFilter),
    responses(
        (status = 200, description = "Page of orders", body = Vec<Order>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_store_orders(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Paginated<Order>>> {
    let page = state
        .services
        .orders()
        .list_store_orders(&actor, store_id, filter, params)
        .await?;
    Ok(Json(page))
}

/// Get an order with its lines, promotions, customer and history
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = OrderWithDetails),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderWithDetails>> {
    let order = state.services.orders().get_order(&actor, id).await?;
    Ok(Json(order))
}

/// Pay or cancel an order
#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrder,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Illegal status change or insufficient wallet balance")
    )
)]
pub async fn update_order(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateOrder>,
) -> AppResult<Json<Order>> {
    let order = state
        .services
        .orders()
        .update_order(&actor, id, payload)
        .await?;
    Ok(Json(order))
}

/// Sales report of a store over a time range
#[utoipa::path(
    get,
    path = "/stores/{id}/report",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID"), ReportRange),
    responses(
        (status = 200, description = "Store report", body = StoreReport),
        (status = 400, description = "Range must start before it ends"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn store_report(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Query(range): Query<ReportRange>,
) -> AppResult<Json<StoreReport>> {
    let report = state
        .services
        .orders()
        .store_report(&actor, store_id, range)
        .await?;
    Ok(Json(report))
}
