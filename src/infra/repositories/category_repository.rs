//! Product category repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain, into_domain_opt, into_domain_page};
use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use crate::domain::Category;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Category>>;

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Category>>;

    async fn create(&self, category: Category) -> AppResult<Category>;

    async fn update(&self, category: Category) -> AppResult<Category>;

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Category>, u64)>;
}

pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        into_domain_opt(CategoryEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Category>> {
        let row = CategoryEntity::find()
            .filter(category::Column::BrandId.eq(brand_id))
            .filter(category::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        into_domain_opt(row)
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        into_domain(rows)
    }

    async fn create(&self, category: Category) -> AppResult<Category> {
        let model = ActiveModel::from(&category).insert(&self.db).await?;
        Category::try_from(model)
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        let model = ActiveModel::from(&category).update(&self.db).await?;
        Category::try_from(model)
    }

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Category>, u64)> {
        let select = CategoryEntity::find()
            .filter(category::Column::BrandId.eq(brand_id))
            .order_by_asc(category::Column::DisplayOrder)
            .order_by_asc(category::Column::Name);
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }
}
