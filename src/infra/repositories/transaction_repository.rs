//! Ledger reads. Ledger rows are only written inside a unit of work.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use super::base::{fetch_page, into_domain_opt, into_domain_page};
use super::entities::transaction::{self, Entity as TransactionEntity};
use crate::domain::{Transaction, TransactionFilter};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Transaction>>;

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        filter: TransactionFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Transaction>, u64)>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Transaction>, u64)>;
}

pub struct TransactionStore {
    db: DatabaseConnection,
}

impl TransactionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(select: Select<TransactionEntity>, filter: TransactionFilter) -> Select<TransactionEntity> {
        let select = select.order_by_desc(transaction::Column::CreatedAt);
        match filter.transaction_type {
            Some(kind) => select.filter(transaction::Column::TransactionType.eq(kind.as_str())),
            None => select,
        }
    }
}

#[async_trait]
impl TransactionRepository for TransactionStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Transaction>> {
        into_domain_opt(TransactionEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        filter: TransactionFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Transaction>, u64)> {
        let select = Self::filtered(
            TransactionEntity::find().filter(transaction::Column::BrandId.eq(brand_id)),
            filter,
        );
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Transaction>, u64)> {
        let select = Self::filtered(
            TransactionEntity::find().filter(transaction::Column::UserId.eq(user_id)),
            filter,
        );
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }
}
