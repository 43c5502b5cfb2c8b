use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Order;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub store_id: Uuid,
    pub session_id: Uuid,
    pub invoice_id: String,
    pub order_type: String,
    pub payment_type: String,
    pub status: String,
    pub total_amount: f64,
    pub line_discount: f64,
    pub promotion_discount: f64,
    pub discount: f64,
    pub vat_rate: f64,
    pub vat_amount: f64,
    pub final_amount: f64,
    pub number_of_guests: i32,
    pub note: Option<String>,
    pub created_by: Uuid,
    pub checkin_date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Order {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Order {
            id: model.id,
            brand_id: model.brand_id,
            store_id: model.store_id,
            session_id: model.session_id,
            invoice_id: model.invoice_id,
            order_type: parse_column("order_type", &model.order_type)?,
            payment_type: parse_column("payment_type", &model.payment_type)?,
            status: parse_column("status", &model.status)?,
            total_amount: model.total_amount,
            line_discount: model.line_discount,
            promotion_discount: model.promotion_discount,
            discount: model.discount,
            vat_rate: model.vat_rate,
            vat_amount: model.vat_amount,
            final_amount: model.final_amount,
            number_of_guests: model.number_of_guests,
            note: model.note,
            created_by: model.created_by,
            checkin_date: model.checkin_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Order> for ActiveModel {
    fn from(order: &Order) -> Self {
        ActiveModel {
            id: Set(order.id),
            brand_id: Set(order.brand_id),
            store_id: Set(order.store_id),
            session_id: Set(order.session_id),
            invoice_id: Set(order.invoice_id.clone()),
            order_type: Set(order.order_type.as_str().to_string()),
            payment_type: Set(order.payment_type.as_str().to_string()),
            status: Set(order.status.as_str().to_string()),
            total_amount: Set(order.total_amount),
            line_discount: Set(order.line_discount),
            promotion_discount: Set(order.promotion_discount),
            discount: Set(order.discount),
            vat_rate: Set(order.vat_rate),
            vat_amount: Set(order.vat_amount),
            final_amount: Set(order.final_amount),
            number_of_guests: Set(order.number_of_guests),
            note: Set(order.note.clone()),
            created_by: Set(order.created_by),
            checkin_date: Set(order.checkin_date),
            created_at: Set(order.created_at),
            updated_at: Set(order.updated_at),
        }
    }
}
