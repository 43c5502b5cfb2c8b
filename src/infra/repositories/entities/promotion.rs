use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Promotion;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "promotions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub promotion_type: String,
    pub value: f64,
    pub max_discount: f64,
    pub min_condition_amount: f64,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Promotion {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Promotion {
            id: model.id,
            brand_id: model.brand_id,
            code: model.code,
            name: model.name,
            description: model.description,
            promotion_type: parse_column("promotion_type", &model.promotion_type)?,
            value: model.value,
            max_discount: model.max_discount,
            min_condition_amount: model.min_condition_amount,
            start_date: model.start_date,
            end_date: model.end_date,
            status: parse_column("status", &model.status)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Promotion> for ActiveModel {
    fn from(promotion: &Promotion) -> Self {
        ActiveModel {
            id: Set(promotion.id),
            brand_id: Set(promotion.brand_id),
            code: Set(promotion.code.clone()),
            name: Set(promotion.name.clone()),
            description: Set(promotion.description.clone()),
            promotion_type: Set(promotion.promotion_type.as_str().to_string()),
            value: Set(promotion.value),
            max_discount: Set(promotion.max_discount),
            min_condition_amount: Set(promotion.min_condition_amount),
            start_date: Set(promotion.start_date),
            end_date: Set(promotion.end_date),
            status: Set(promotion.status.as_str().to_string()),
            created_at: Set(promotion.created_at),
            updated_at: Set(promotion.updated_at),
        }
    }
}
