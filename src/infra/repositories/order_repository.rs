//! Read side of orders. Writes go through the unit of work.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain, into_domain_opt, into_domain_page};
use super::entities::order::{self, Entity as OrderEntity};
use super::entities::order_detail::{self, Entity as OrderDetailEntity};
use super::entities::order_history::{self, Entity as OrderHistoryEntity};
use super::entities::order_user::{self, Entity as OrderUserEntity};
use super::entities::promotion_order::{self, Entity as PromotionOrderEntity};
use crate::domain::{
    Order, OrderDetail, OrderFilter, OrderStatus, OrderUser, OrderWithDetails,
    PromotionOrderMapping,
};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;

    async fn find_with_details(&self, id: Uuid) -> AppResult<Option<OrderWithDetails>>;

    async fn list_by_store(
        &self,
        store_id: Uuid,
        filter: OrderFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Every order of a store checked in within `[from, to)`
    async fn list_in_range(
        &self,
        store_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Order>>;

    /// Paid orders linked to a member whose points haven't been synced yet
    async fn list_unsynced(&self, limit: u64) -> AppResult<Vec<(Order, OrderUser)>>;

    async fn count_unsynced(&self) -> AppResult<u64>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Member customers of paid orders that were never reported.
    fn unsynced_customers() -> sea_orm::Select<OrderUserEntity> {
        let paid_orders = OrderEntity::find()
            .select_only()
            .column(order::Column::Id)
            .filter(order::Column::Status.eq(OrderStatus::Paid.as_str()))
            .into_query();
        OrderUserEntity::find()
            .filter(order_user::Column::IsSync.eq(false))
            .filter(order_user::Column::UserId.is_not_null())
            .filter(order_user::Column::OrderId.in_subquery(paid_orders))
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        into_domain_opt(OrderEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_with_details(&self, id: Uuid) -> AppResult<Option<OrderWithDetails>> {
        let row = OrderEntity::find_by_id(id).one(&self.db).await?;
        let Some(order) = into_domain_opt::<_, Order>(row)? else {
            return Ok(None);
        };

        let details = OrderDetailEntity::find()
            .filter(order_detail::Column::OrderId.eq(id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(OrderDetail::from)
            .collect();
        let promotions = PromotionOrderEntity::find()
            .filter(promotion_order::Column::OrderId.eq(id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(PromotionOrderMapping::from)
            .collect();
        let customer = OrderUserEntity::find()
            .filter(order_user::Column::OrderId.eq(id))
            .one(&self.db)
            .await?
            .map(OrderUser::from);
        let history = into_domain(
            OrderHistoryEntity::find()
                .filter(order_history::Column::OrderId.eq(id))
                .order_by_asc(order_history::Column::CreatedAt)
                .all(&self.db)
                .await?,
        )?;

        Ok(Some(OrderWithDetails {
            order,
            details,
            promotions,
            customer,
            history,
        }))
    }

    async fn list_by_store(
        &self,
        store_id: Uuid,
        filter: OrderFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let mut select = OrderEntity::find()
            .filter(order::Column::StoreId.eq(store_id))
            .order_by_desc(order::Column::CheckinDate);
        if let Some(status) = filter.status {
            select = select.filter(order::Column::Status.eq(status.as_str()));
        }
        if let Some(order_type) = filter.order_type {
            select = select.filter(order::Column::OrderType.eq(order_type.as_str()));
        }
        if let Some(payment_type) = filter.payment_type {
            select = select.filter(order::Column::PaymentType.eq(payment_type.as_str()));
        }
        if let Some(from) = filter.from {
            select = select.filter(order::Column::CheckinDate.gte(from));
        }
        if let Some(to) = filter.to {
            select = select.filter(order::Column::CheckinDate.lt(to));
        }
        if let Some(invoice) = filter.invoice_id.filter(|s| !s.trim().is_empty()) {
            select = select.filter(order::Column::InvoiceId.contains(invoice.trim()));
        }
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }

    async fn list_in_range(
        &self,
        store_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Order>> {
        let rows = OrderEntity::find()
            .filter(order::Column::StoreId.eq(store_id))
            .filter(order::Column::CheckinDate.gte(from))
            .filter(order::Column::CheckinDate.lt(to))
            .all(&self.db)
            .await?;
        into_domain(rows)
    }

    async fn list_unsynced(&self, limit: u64) -> AppResult<Vec<(Order, OrderUser)>> {
        let customers: Vec<OrderUser> = Self::unsynced_customers()
            .order_by_asc(order_user::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(OrderUser::from)
            .collect();
        if customers.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<Uuid> = customers.iter().map(|c| c.order_id).collect();
        let orders: Vec<Order> = into_domain(
            OrderEntity::find()
                .filter(order::Column::Id.is_in(order_ids))
                .all(&self.db)
                .await?,
        )?;

        Ok(customers
            .into_iter()
            .filter_map(|customer| {
                orders
                    .iter()
                    .find(|o| o.id == customer.order_id)
                    .map(|order| (order.clone(), customer))
            })
            .collect())
    }

    async fn count_unsynced(&self) -> AppResult<u64> {
        Ok(Self::unsynced_customers().count(&self.db).await?)
    }
}
