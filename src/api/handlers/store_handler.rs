//! Store and session handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use uuid::Uuid;

use super::brand_handler::NameQuery;
use super::{account_handler, menu_handler, order_handler};
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Actor, CreateSessions, CreateStore, Session, Store, UpdateSession, UpdateStore};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Create store routes, including what hangs off a store
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_store))
        .route("/:id", get(get_store).put(update_store))
        .route("/:id/sessions", get(list_sessions).post(create_sessions))
        .route("/:id/sessions/current", get(get_current_session))
        .route("/:id/menu", get(menu_handler::get_store_menu))
        .route(
            "/:id/orders",
            get(order_handler::list_store_orders).post(order_handler::create_order),
        )
        .route("/:id/report", get(order_handler::store_report))
        .route("/:id/accounts", get(account_handler::list_store_accounts))
}

/// Create session routes
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/:id", put(update_session))
}

/// Open a store in the caller's brand
#[utoipa::path(
    post,
    path = "/stores",
    tag = "Stores",
    security(("bearer_auth" = [])),
    request_body = CreateStore,
    responses(
        (status = 201, description = "Store created", body = Store),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Brand admin only"),
        (status = 409, description = "Store code already exists")
    )
)]
pub async fn create_store(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateStore>,
) -> AppResult<(StatusCode, Json<Store>)> {
    let store = state.services.stores().create_store(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// Get a store
#[utoipa::path(
    get,
    path = "/stores/{id}",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store", body = Store),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn get_store(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Store>> {
    let store = state.services.stores().get_store(&actor, id).await?;
    Ok(Json(store))
}

/// Update a store
#[utoipa::path(
    put,
    path = "/stores/{id}",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = UpdateStore,
    responses(
        (status = 200, description = "Store updated", body = Store),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn update_store(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStore>,
) -> AppResult<Json<Store>> {
    let store = state
        .services
        .stores()
        .update_store(&actor, id, payload)
        .await?;
    Ok(Json(store))
}

/// Stores of a brand
#[utoipa::path(
    get,
    path = "/brands/{id}/stores",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Brand ID"), PaginationParams, NameQuery),
    responses(
        (status = 200, description = "Page of stores", body = Vec<Store>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_brand_stores(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(brand_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
    Query(query): Query<NameQuery>,
) -> AppResult<Json<Paginated<Store>>> {
    let page = state
        .services
        .stores()
        .list_stores(&actor, brand_id, query.name, params)
        .await?;
    Ok(Json(page))
}

/// Schedule sessions for a store
#[utoipa::path(
    post,
    path = "/stores/{id}/sessions",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = CreateSessions,
    responses(
        (status = 201, description = "Sessions created", body = Vec<Session>),
        (status = 400, description = "Invalid or overlapping windows"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_sessions(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateSessions>,
) -> AppResult<(StatusCode, Json<Vec<Session>>)> {
    let sessions = state
        .services
        .stores()
        .create_sessions(&actor, store_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(sessions)))
}

/// Sessions of a store, latest first
#[utoipa::path(
    get,
    path = "/stores/{id}/sessions",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID"), PaginationParams),
    responses(
        (status = 200, description = "Page of sessions", body = Vec<Session>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_sessions(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Session>>> {
    let page = state
        .services
        .stores()
        .list_sessions(&actor, store_id, params)
        .await?;
    Ok(Json(page))
}

/// Session open right now
#[utoipa::path(
    get,
    path = "/stores/{id}/sessions/current",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Open session", body = Session),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No open session")
    )
)]
pub async fn get_current_session(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
) -> AppResult<Json<Session>> {
    let session = state
        .services
        .stores()
        .get_current_session(&actor, store_id, Utc::now())
        .await?;
    Ok(Json(session))
}

/// Rename or reschedule a session
#[utoipa::path(
    put,
    path = "/sessions/{id}",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = UpdateSession,
    responses(
        (status = 200, description = "Session updated", body = Session),
        (status = 400, description = "Invalid window"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Session not found"),
        (status = 422, description = "Session already started or overlapping")
    )
)]
pub async fn update_session(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSession>,
) -> AppResult<Json<Session>> {
    let session = state
        .services
        .stores()
        .update_session(&actor, id, payload, Utc::now())
        .await?;
    Ok(Json(session))
}
