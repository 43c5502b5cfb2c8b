//! Product repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain, into_domain_opt, into_domain_page};
use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{Product, ProductFilter};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Product>>;

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>>;

    async fn create(&self, product: Product) -> AppResult<Product>;

    async fn update(&self, product: Product) -> AppResult<Product>;

    async fn list(
        &self,
        brand_id: Uuid,
        filter: ProductFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;
}

pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        into_domain_opt(ProductEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Product>> {
        let row = ProductEntity::find()
            .filter(product::Column::BrandId.eq(brand_id))
            .filter(product::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        into_domain_opt(row)
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = ProductEntity::find()
            .filter(product::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        into_domain(rows)
    }

    async fn create(&self, product: Product) -> AppResult<Product> {
        let model = ActiveModel::from(&product).insert(&self.db).await?;
        Product::try_from(model)
    }

    async fn update(&self, product: Product) -> AppResult<Product> {
        let model = ActiveModel::from(&product).update(&self.db).await?;
        Product::try_from(model)
    }

    async fn list(
        &self,
        brand_id: Uuid,
        filter: ProductFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let mut select = ProductEntity::find()
            .filter(product::Column::BrandId.eq(brand_id))
            .order_by_asc(product::Column::DisplayOrder)
            .order_by_asc(product::Column::Name);
        if let Some(name) = filter.name.filter(|n| !n.trim().is_empty()) {
            select = select.filter(product::Column::Name.contains(name.trim()));
        }
        if let Some(product_type) = filter.product_type {
            select = select.filter(product::Column::ProductType.eq(product_type.as_str()));
        }
        if let Some(category_id) = filter.category_id {
            select = select.filter(product::Column::CategoryId.eq(category_id));
        }
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }
}
