use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Transaction;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub user_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub amount: f64,
    pub currency: String,
    pub transaction_type: String,
    pub is_increase: bool,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Transaction {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Transaction {
            id: model.id,
            brand_id: model.brand_id,
            user_id: model.user_id,
            order_id: model.order_id,
            amount: model.amount,
            currency: parse_column("currency", &model.currency)?,
            transaction_type: parse_column("transaction_type", &model.transaction_type)?,
            is_increase: model.is_increase,
            description: model.description,
            created_at: model.created_at,
        })
    }
}

impl From<&Transaction> for ActiveModel {
    fn from(entry: &Transaction) -> Self {
        ActiveModel {
            id: Set(entry.id),
            brand_id: Set(entry.brand_id),
            user_id: Set(entry.user_id),
            order_id: Set(entry.order_id),
            amount: Set(entry.amount),
            currency: Set(entry.currency.as_str().to_string()),
            transaction_type: Set(entry.transaction_type.as_str().to_string()),
            is_increase: Set(entry.is_increase),
            description: Set(entry.description.clone()),
            created_at: Set(entry.created_at),
        }
    }
}
