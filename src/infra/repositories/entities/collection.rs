use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Collection;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub pic_url: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Collection {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Collection {
            id: model.id,
            brand_id: model.brand_id,
            code: model.code,
            name: model.name,
            description: model.description,
            pic_url: model.pic_url,
            status: parse_column("status", &model.status)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Collection> for ActiveModel {
    fn from(collection: &Collection) -> Self {
        ActiveModel {
            id: Set(collection.id),
            brand_id: Set(collection.brand_id),
            code: Set(collection.code.clone()),
            name: Set(collection.name.clone()),
            description: Set(collection.description.clone()),
            pic_url: Set(collection.pic_url.clone()),
            status: Set(collection.status.as_str().to_string()),
            created_at: Set(collection.created_at),
            updated_at: Set(collection.updated_at),
        }
    }
}
