use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::OrderUser;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "order_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_sync: bool,
    pub synced_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for OrderUser {
    fn from(model: Model) -> Self {
        OrderUser {
            id: model.id,
            order_id: model.order_id,
            user_id: model.user_id,
            name: model.name,
            phone: model.phone,
            address: model.address,
            is_sync: model.is_sync,
            synced_at: model.synced_at,
            created_at: model.created_at,
        }
    }
}

impl From<&OrderUser> for ActiveModel {
    fn from(customer: &OrderUser) -> Self {
        ActiveModel {
            id: Set(customer.id),
            order_id: Set(customer.order_id),
            user_id: Set(customer.user_id),
            name: Set(customer.name.clone()),
            phone: Set(customer.phone.clone()),
            address: Set(customer.address.clone()),
            is_sync: Set(customer.is_sync),
            synced_at: Set(customer.synced_at),
            created_at: Set(customer.created_at),
        }
    }
}
