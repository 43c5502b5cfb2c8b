//! Staff account repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain_opt, into_domain_page};
use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::domain::Account;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    async fn create(&self, account: Account) -> AppResult<Account>;

    async fn update(&self, account: Account) -> AppResult<Account>;

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)>;

    async fn list_by_store(
        &self,
        store_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)>;
}

pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        into_domain_opt(AccountEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let row = AccountEntity::find()
            .filter(account::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        into_domain_opt(row)
    }

    async fn create(&self, account: Account) -> AppResult<Account> {
        let model = ActiveModel::from(&account).insert(&self.db).await?;
        Account::try_from(model)
    }

    async fn update(&self, account: Account) -> AppResult<Account> {
        let model = ActiveModel::from(&account).update(&self.db).await?;
        Account::try_from(model)
    }

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)> {
        let select = AccountEntity::find()
            .filter(account::Column::BrandId.eq(brand_id))
            .order_by_asc(account::Column::Username);
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }

    async fn list_by_store(
        &self,
        store_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Account>, u64)> {
        let select = AccountEntity::find()
            .filter(account::Column::StoreId.eq(store_id))
            .order_by_asc(account::Column::Username);
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }
}
