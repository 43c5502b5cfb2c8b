use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Store;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub code: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub wifi_name: Option<String>,
    pub wifi_password: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Store {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Store {
            id: model.id,
            brand_id: model.brand_id,
            name: model.name,
            short_name: model.short_name,
            code: model.code,
            email: model.email,
            phone: model.phone,
            address: model.address,
            wifi_name: model.wifi_name,
            wifi_password: model.wifi_password,
            status: parse_column("status", &model.status)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Store> for ActiveModel {
    fn from(store: &Store) -> Self {
        ActiveModel {
            id: Set(store.id),
            brand_id: Set(store.brand_id),
            name: Set(store.name.clone()),
            short_name: Set(store.short_name.clone()),
            code: Set(store.code.clone()),
            email: Set(store.email.clone()),
            phone: Set(store.phone.clone()),
            address: Set(store.address.clone()),
            wifi_name: Set(store.wifi_name.clone()),
            wifi_password: Set(store.wifi_password.clone()),
            status: Set(store.status.as_str().to_string()),
            created_at: Set(store.created_at),
            updated_at: Set(store.updated_at),
        }
    }
}
