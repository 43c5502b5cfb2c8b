//! Promotion repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain, into_domain_opt, into_domain_page};
use super::entities::promotion::{self, ActiveModel, Entity as PromotionEntity};
use crate::domain::Promotion;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PromotionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Promotion>>;

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Promotion>>;

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Promotion>>;

    async fn create(&self, promotion: Promotion) -> AppResult<Promotion>;

    async fn update(&self, promotion: Promotion) -> AppResult<Promotion>;

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Promotion>, u64)>;
}

pub struct PromotionStore {
    db: DatabaseConnection,
}

impl PromotionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PromotionRepository for PromotionStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Promotion>> {
        into_domain_opt(PromotionEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Promotion>> {
        let row = PromotionEntity::find()
            .filter(promotion::Column::BrandId.eq(brand_id))
            .filter(promotion::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        into_domain_opt(row)
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Promotion>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = PromotionEntity::find()
            .filter(promotion::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        into_domain(rows)
    }

    async fn create(&self, promotion: Promotion) -> AppResult<Promotion> {
        let model = ActiveModel::from(&promotion).insert(&self.db).await?;
        Promotion::try_from(model)
    }

    async fn update(&self, promotion: Promotion) -> AppResult<Promotion> {
        let model = ActiveModel::from(&promotion).update(&self.db).await?;
        Promotion::try_from(model)
    }

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Promotion>, u64)> {
        let select = PromotionEntity::find()
            .filter(promotion::Column::BrandId.eq(brand_id))
            .order_by_desc(promotion::Column::StartDate);
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }
}
