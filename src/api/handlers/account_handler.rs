//! Staff account handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{AccountResponse, Actor, CreateAccount, UpdateAccount};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Create account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_account))
        .route("/:id", get(get_account).put(update_account))
}

/// Create a staff account
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = CreateAccount,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - Role cannot create this account"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_account(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAccount>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let account = state
        .services
        .accounts()
        .create_account(&actor, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Get a staff account
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    let account = state.services.accounts().get_account(&actor, id).await?;
    Ok(Json(account))
}

/// Update a staff account
#[utoipa::path(
    put,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = UpdateAccount,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn update_account(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAccount>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts()
        .update_account(&actor, id, payload)
        .await?;
    Ok(Json(account))
}

/// Accounts of a brand
#[utoipa::path(
    get,
    path = "/brands/{id}/accounts",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Brand ID"), PaginationParams),
    responses(
        (status = 200, description = "Page of accounts", body = Vec<AccountResponse>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_brand_accounts(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(brand_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AccountResponse>>> {
    let page = state
        .services
        .accounts()
        .list_brand_accounts(&actor, brand_id, params)
        .await?;
    Ok(Json(page))
}

/// Accounts working in a store
#[utoipa::path(
    get,
    path = "/stores/{id}/accounts",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID"), PaginationParams),
    responses(
        (status = 200, description = "Page of accounts", body = Vec<AccountResponse>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_store_accounts(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(store_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AccountResponse>>> {
    let page = state
        .services
        .accounts()
        .list_store_accounts(&actor, store_id, params)
        .await?;
    Ok(Json(page))
}
