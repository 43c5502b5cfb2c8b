use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Product;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub category_id: Uuid,
    pub parent_product_id: Option<Uuid>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub pic_url: Option<String>,
    pub product_type: String,
    pub size: Option<String>,
    pub selling_price: f64,
    pub historical_price: f64,
    pub discount_price: f64,
    pub display_order: i32,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Product {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Product {
            id: model.id,
            brand_id: model.brand_id,
            category_id: model.category_id,
            parent_product_id: model.parent_product_id,
            code: model.code,
            name: model.name,
            description: model.description,
            pic_url: model.pic_url,
            product_type: parse_column("product_type", &model.product_type)?,
            size: model.size,
            selling_price: model.selling_price,
            historical_price: model.historical_price,
            discount_price: model.discount_price,
            display_order: model.display_order,
            status: parse_column("status", &model.status)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            brand_id: Set(product.brand_id),
            category_id: Set(product.category_id),
            parent_product_id: Set(product.parent_product_id),
            code: Set(product.code.clone()),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            pic_url: Set(product.pic_url.clone()),
            product_type: Set(product.product_type.as_str().to_string()),
            size: Set(product.size.clone()),
            selling_price: Set(product.selling_price),
            historical_price: Set(product.historical_price),
            discount_price: Set(product.discount_price),
            display_order: Set(product.display_order),
            status: Set(product.status.as_str().to_string()),
            created_at: Set(product.created_at),
            updated_at: Set(product.updated_at),
        }
    }
}
