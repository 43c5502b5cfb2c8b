//! Brand repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain_opt, into_domain_page};
use super::entities::brand::{self, ActiveModel, Entity as BrandEntity};
use crate::domain::Brand;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BrandRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Brand>>;

    /// Codes are stored upper-cased
    async fn find_by_code(&self, brand_code: &str) -> AppResult<Option<Brand>>;

    async fn create(&self, brand: Brand) -> AppResult<Brand>;

    async fn update(&self, brand: Brand) -> AppResult<Brand>;

    async fn list(
        &self,
        name: Option<String>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Brand>, u64)>;
}

pub struct BrandStore {
    db: DatabaseConnection,
}

impl BrandStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BrandRepository for BrandStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Brand>> {
        into_domain_opt(BrandEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_code(&self, brand_code: &str) -> AppResult<Option<Brand>> {
        let row = BrandEntity::find()
            .filter(brand::Column::BrandCode.eq(brand_code))
            .one(&self.db)
            .await?;
        into_domain_opt(row)
    }

    async fn create(&self, brand: Brand) -> AppResult<Brand> {
        let model = ActiveModel::from(&brand).insert(&self.db).await?;
        Brand::try_from(model)
    }

    async fn update(&self, brand: Brand) -> AppResult<Brand> {
        let model = ActiveModel::from(&brand).update(&self.db).await?;
        Brand::try_from(model)
    }

    async fn list(
        &self,
        name: Option<String>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Brand>, u64)> {
        let mut select = BrandEntity::find().order_by_asc(brand::Column::Name);
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            select = select.filter(brand::Column::Name.contains(name.trim()));
        }
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }
}
