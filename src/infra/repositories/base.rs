//! Query helpers shared by every repository.
//!
//! Repositories hand out domain types; these helpers run the paginated or
//! plain selects and convert rows on the way out.

use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Select};

use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Run `select` one page at a time, returning the page and the total row count.
pub async fn fetch_page<C, E>(
    db: &C,
    select: Select<E>,
    params: &PaginationParams,
) -> AppResult<(Vec<E::Model>, u64)>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync,
{
    let paginator = select.paginate(db, params.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(params.page_index()).await?;
    Ok((rows, total))
}

/// Convert every row into its domain type.
pub fn into_domain<M, D>(rows: Vec<M>) -> AppResult<Vec<D>>
where
    D: TryFrom<M, Error = AppError>,
{
    rows.into_iter().map(D::try_from).collect()
}

/// Convert a page of rows into domain types, keeping the total.
pub fn into_domain_page<M, D>((rows, total): (Vec<M>, u64)) -> AppResult<(Vec<D>, u64)>
where
    D: TryFrom<M, Error = AppError>,
{
    Ok((into_domain(rows)?, total))
}

/// Convert an optional row into its domain type.
pub fn into_domain_opt<M, D>(row: Option<M>) -> AppResult<Option<D>>
where
    D: TryFrom<M, Error = AppError>,
{
    row.map(D::try_from).transpose()
}
