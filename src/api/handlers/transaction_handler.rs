//! Ledger handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{Actor, Transaction, TransactionFilter};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Create transaction routes
pub fn transaction_routes() -> Router<AppState> {
    Router::new().route("/:id", get(get_transaction))
}

/// Get a ledger entry
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction", body = Transaction),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Transaction>> {
    let transaction = state
        .services
        .transactions()
        .get_transaction(&actor, id)
        .await?;
    Ok(Json(transaction))
}

/// Ledger of a brand
#[utoipa::path(
    get,
    path = "/brands/{id}/transactions",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Brand ID"), PaginationParams, TransactionFilter),
    responses(
        (status = 200, description = "Page of transactions", body = Vec<Transaction>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_brand_transactions(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(brand_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<Json<Paginated<Transaction>>> {
    let page = state
        .services
        .transactions()
        .list_brand_transactions(&actor, brand_id, filter, params)
        .await?;
    Ok(Json(page))
}

/// Ledger of a member
#[utoipa::path(
    get,
    path = "/users/{id}/transactions",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Member ID"), PaginationParams, TransactionFilter),
    responses(
        (status = 200, description = "Page of transactions", body = Vec<Transaction>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_user_transactions(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<Json<Paginated<Transaction>>> {
    let page = state
        .services
        .transactions()
        .list_user_transactions(&actor, user_id, filter, params)
        .await?;
    Ok(Json(page))
}
