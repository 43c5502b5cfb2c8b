use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Variant;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "variants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub value: String,
    pub display_order: i32,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Variant {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Variant {
            id: model.id,
            brand_id: model.brand_id,
            name: model.name,
            value: model.value,
            display_order: model.display_order,
            status: parse_column("status", &model.status)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Variant> for ActiveModel {
    fn from(variant: &Variant) -> Self {
        ActiveModel {
            id: Set(variant.id),
            brand_id: Set(variant.brand_id),
            name: Set(variant.name.clone()),
            value: Set(variant.value.clone()),
            display_order: Set(variant.display_order),
            status: Set(variant.status.as_str().to_string()),
            created_at: Set(variant.created_at),
            updated_at: Set(variant.updated_at),
        }
    }
}
