use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::OrderHistory;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "order_histories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub from_status: Option<String>,
    pub to_status: String,
    pub changed_by: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for OrderHistory {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(OrderHistory {
            id: model.id,
            order_id: model.order_id,
            from_status: model
                .from_status
                .as_deref()
                .map(|status| parse_column("from_status", status))
                .transpose()?,
            to_status: parse_column("to_status", &model.to_status)?,
            changed_by: model.changed_by,
            note: model.note,
            created_at: model.created_at,
        })
    }
}

impl From<&OrderHistory> for ActiveModel {
    fn from(history: &OrderHistory) -> Self {
        ActiveModel {
            id: Set(history.id),
            order_id: Set(history.order_id),
            from_status: Set(history.from_status.map(|s| s.as_str().to_string())),
            to_status: Set(history.to_status.as_str().to_string()),
            changed_by: Set(history.changed_by),
            note: Set(history.note.clone()),
            created_at: Set(history.created_at),
        }
    }
}
