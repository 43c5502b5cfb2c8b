use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Brand;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "brands")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub brand_code: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub pic_url: Option<String>,
    pub status: String,
    pub brand_balance: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Brand {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Brand {
            id: model.id,
            name: model.name,
            brand_code: model.brand_code,
            email: model.email,
            phone: model.phone,
            address: model.address,
            pic_url: model.pic_url,
            status: parse_column("status", &model.status)?,
            brand_balance: model.brand_balance,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Brand> for ActiveModel {
    fn from(brand: &Brand) -> Self {
        ActiveModel {
            id: Set(brand.id),
            name: Set(brand.name.clone()),
            brand_code: Set(brand.brand_code.clone()),
            email: Set(brand.email.clone()),
            phone: Set(brand.phone.clone()),
            address: Set(brand.address.clone()),
            pic_url: Set(brand.pic_url.clone()),
            status: Set(brand.status.as_str().to_string()),
            brand_balance: Set(brand.brand_balance),
            created_at: Set(brand.created_at),
            updated_at: Set(brand.updated_at),
        }
    }
}
