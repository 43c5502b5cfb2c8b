use chrono::NaiveTime;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Menu;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "menus")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub code: String,
    pub priority: i32,
    pub date_filter: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Menu {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Menu {
            id: model.id,
            brand_id: model.brand_id,
            code: model.code,
            priority: model.priority,
            date_filter: model.date_filter,
            start_time: model.start_time,
            end_time: model.end_time,
            status: parse_column("status", &model.status)?,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Menu> for ActiveModel {
    fn from(menu: &Menu) -> Self {
        ActiveModel {
            id: Set(menu.id),
            brand_id: Set(menu.brand_id),
            code: Set(menu.code.clone()),
            priority: Set(menu.priority),
            date_filter: Set(menu.date_filter),
            start_time: Set(menu.start_time),
            end_time: Set(menu.end_time),
            status: Set(menu.status.as_str().to_string()),
            created_by: Set(menu.created_by),
            created_at: Set(menu.created_at),
            updated_at: Set(menu.updated_at),
        }
    }
}
