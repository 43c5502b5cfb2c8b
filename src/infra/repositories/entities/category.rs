use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Category;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub code: String,
    pub name: String,
    pub category_type: String,
    pub display_order: i32,
    pub description: Option<String>,
    pub pic_url: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Category {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Category {
            id: model.id,
            brand_id: model.brand_id,
            code: model.code,
            name: model.name,
            category_type: parse_column("category_type", &model.category_type)?,
            display_order: model.display_order,
            description: model.description,
            pic_url: model.pic_url,
            status: parse_column("status", &model.status)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        ActiveModel {
            id: Set(category.id),
            brand_id: Set(category.brand_id),
            code: Set(category.code.clone()),
            name: Set(category.name.clone()),
            category_type: Set(category.category_type.as_str().to_string()),
            display_order: Set(category.display_order),
            description: Set(category.description.clone()),
            pic_url: Set(category.pic_url.clone()),
            status: Set(category.status.as_str().to_string()),
            created_at: Set(category.created_at),
            updated_at: Set(category.updated_at),
        }
    }
}
