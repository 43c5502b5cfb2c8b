//! Promotions used by an order.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::PromotionOrderMapping;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "promotion_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub promotion_id: Uuid,
    pub quantity: i32,
    pub discount_amount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PromotionOrderMapping {
    fn from(model: Model) -> Self {
        PromotionOrderMapping {
            id: model.id,
            order_id: model.order_id,
            promotion_id: model.promotion_id,
            quantity: model.quantity,
            discount_amount: model.discount_amount,
        }
    }
}

impl From<&PromotionOrderMapping> for ActiveModel {
    fn from(mapping: &PromotionOrderMapping) -> Self {
        ActiveModel {
            id: Set(mapping.id),
            order_id: Set(mapping.order_id),
            promotion_id: Set(mapping.promotion_id),
            quantity: Set(mapping.quantity),
            discount_amount: Set(mapping.discount_amount),
        }
    }
}
