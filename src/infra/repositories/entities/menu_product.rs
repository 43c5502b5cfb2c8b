use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::MenuProduct;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "menu_products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub menu_id: Uuid,
    pub product_id: Uuid,
    pub selling_price: f64,
    pub discount_price: f64,
    pub historical_price: f64,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MenuProduct {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(MenuProduct {
            id: model.id,
            menu_id: model.menu_id,
            product_id: model.product_id,
            selling_price: model.selling_price,
            discount_price: model.discount_price,
            historical_price: model.historical_price,
            status: parse_column("status", &model.status)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&MenuProduct> for ActiveModel {
    fn from(entry: &MenuProduct) -> Self {
        ActiveModel {
            id: Set(entry.id),
            menu_id: Set(entry.menu_id),
            product_id: Set(entry.product_id),
            selling_price: Set(entry.selling_price),
            discount_price: Set(entry.discount_price),
            historical_price: Set(entry.historical_price),
            status: Set(entry.status.as_str().to_string()),
            created_at: Set(entry.created_at),
            updated_at: Set(entry.updated_at),
        }
    }
}
