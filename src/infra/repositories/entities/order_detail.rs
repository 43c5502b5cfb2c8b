use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::OrderDetail;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub parent_detail_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub selling_price: f64,
    pub discount_price: f64,
    pub total_amount: f64,
    pub discount: f64,
    pub final_amount: f64,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for OrderDetail {
    fn from(model: Model) -> Self {
        OrderDetail {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            parent_detail_id: model.parent_detail_id,
            product_name: model.product_name,
            quantity: model.quantity,
            selling_price: model.selling_price,
            discount_price: model.discount_price,
            total_amount: model.total_amount,
            discount: model.discount,
            final_amount: model.final_amount,
            note: model.note,
        }
    }
}

impl From<&OrderDetail> for ActiveModel {
    fn from(detail: &OrderDetail) -> Self {
        ActiveModel {
            id: Set(detail.id),
            order_id: Set(detail.order_id),
            product_id: Set(detail.product_id),
            parent_detail_id: Set(detail.parent_detail_id),
            product_name: Set(detail.product_name.clone()),
            quantity: Set(detail.quantity),
            selling_price: Set(detail.selling_price),
            discount_price: Set(detail.discount_price),
            total_amount: Set(detail.total_amount),
            discount: Set(detail.discount),
            final_amount: Set(detail.final_amount),
            note: Set(detail.note.clone()),
        }
    }
}
