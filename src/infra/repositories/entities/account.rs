use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Account;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub status: String,
    pub brand_id: Option<Uuid>,
    pub store_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Account {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            name: model.name,
            role: parse_column("role", &model.role)?,
            status: parse_column("status", &model.status)?,
            brand_id: model.brand_id,
            store_id: model.store_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        ActiveModel {
            id: Set(account.id),
            username: Set(account.username.clone()),
            password_hash: Set(account.password_hash.clone()),
            name: Set(account.name.clone()),
            role: Set(account.role.as_str().to_string()),
            status: Set(account.status.as_str().to_string()),
            brand_id: Set(account.brand_id),
            store_id: Set(account.store_id),
            created_at: Set(account.created_at),
            updated_at: Set(account.updated_at),
        }
    }
}
