//! Shared types: pagination.

mod pagination;

pub use pagination::{Paginated, PaginationMeta, PaginationParams};
