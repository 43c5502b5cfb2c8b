//! SeaORM entity definitions
//!
//! Database rows are kept apart from domain types; each module converts its
//! `Model` into the domain type and a domain value back into an `ActiveModel`.

use std::str::FromStr;

use crate::errors::{AppError, AppResult};

pub mod account;
pub mod blog_post;
pub mod brand;
pub mod category;
pub mod collection;
pub mod collection_product;
pub mod member;
pub mod menu;
pub mod menu_product;
pub mod menu_store;
pub mod order;
pub mod order_detail;
pub mod order_history;
pub mod order_user;
pub mod product;
pub mod promotion;
pub mod promotion_order;
pub mod session;
pub mod store;
pub mod transaction;
pub mod variant;
pub mod variant_product;

/// Parse a stored enumeration; unknown values mean corrupt data.
pub(crate) fn parse_column<T>(column: &str, value: &str) -> AppResult<T>
where
    T: FromStr<Err = AppError>,
{
    value
        .parse()
        .map_err(|_| AppError::internal(format!("Unknown {} value in database: {}", column, value)))
}
