use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::Session;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_id: Uuid,
    pub name: Option<String>,
    pub start_date_time: DateTimeUtc,
    pub end_date_time: DateTimeUtc,
    pub number_of_orders: i32,
    pub last_invoice_ordinal: i32,
    pub total_amount: f64,
    pub total_discount_amount: f64,
    pub total_final_amount: f64,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Session {
    fn from(model: Model) -> Self {
        Session {
            id: model.id,
            store_id: model.store_id,
            name: model.name,
            start_date_time: model.start_date_time,
            end_date_time: model.end_date_time,
            number_of_orders: model.number_of_orders,
            last_invoice_ordinal: model.last_invoice_ordinal,
            total_amount: model.total_amount,
            total_discount_amount: model.total_discount_amount,
            total_final_amount: model.total_final_amount,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Session> for ActiveModel {
    fn from(session: &Session) -> Self {
        ActiveModel {
            id: Set(session.id),
            store_id: Set(session.store_id),
            name: Set(session.name.clone()),
            start_date_time: Set(session.start_date_time),
            end_date_time: Set(session.end_date_time),
            number_of_orders: Set(session.number_of_orders),
            last_invoice_ordinal: Set(session.last_invoice_ordinal),
            total_amount: Set(session.total_amount),
            total_discount_amount: Set(session.total_discount_amount),
            total_final_amount: Set(session.total_final_amount),
            created_by: Set(session.created_by),
            created_at: Set(session.created_at),
            updated_at: Set(session.updated_at),
        }
    }
}
