use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::User;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub phone: String,
    pub password_hash: String,
    pub full_name: String,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub point: i64,
    pub balance: f64,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(User {
            id: model.id,
            brand_id: model.brand_id,
            phone: model.phone,
            password_hash: model.password_hash,
            full_name: model.full_name,
            email: model.email,
            gender: model
                .gender
                .as_deref()
                .map(|gender| parse_column("gender", gender))
                .transpose()?,
            date_of_birth: model.date_of_birth,
            address: model.address,
            point: model.point,
            balance: model.balance,
            status: parse_column("status", &model.status)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        ActiveModel {
            id: Set(user.id),
            brand_id: Set(user.brand_id),
            phone: Set(user.phone.clone()),
            password_hash: Set(user.password_hash.clone()),
            full_name: Set(user.full_name.clone()),
            email: Set(user.email.clone()),
            gender: Set(user.gender.map(|g| g.as_str().to_string())),
            date_of_birth: Set(user.date_of_birth),
            address: Set(user.address.clone()),
            point: Set(user.point),
            balance: Set(user.balance),
            status: Set(user.status.as_str().to_string()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}
