//! Store repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain, into_domain_opt, into_domain_page};
use super::entities::store::{self, ActiveModel, Entity as StoreEntity};
use crate::domain::Store;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>>;

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Store>>;

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Store>>;

    async fn create(&self, store: Store) -> AppResult<Store>;

    async fn update(&self, store: Store) -> AppResult<Store>;

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        name: Option<String>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Store>, u64)>;
}

pub struct StoreStore {
    db: DatabaseConnection,
}

impl StoreStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreRepository for StoreStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>> {
        into_domain_opt(StoreEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Store>> {
        let row = StoreEntity::find()
            .filter(store::Column::BrandId.eq(brand_id))
            .filter(store::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        into_domain_opt(row)
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Store>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = StoreEntity::find()
            .filter(store::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        into_domain(rows)
    }

    async fn create(&self, store: Store) -> AppResult<Store> {
        let model = ActiveModel::from(&store).insert(&self.db).await?;
        Store::try_from(model)
    }

    async fn update(&self, store: Store) -> AppResult<Store> {
        let model = ActiveModel::from(&store).update(&self.db).await?;
        Store::try_from(model)
    }

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        name: Option<String>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Store>, u64)> {
        let mut select = StoreEntity::find()
            .filter(store::Column::BrandId.eq(brand_id))
            .order_by_asc(store::Column::Name);
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            select = select.filter(store::Column::Name.contains(name.trim()));
        }
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }
}
