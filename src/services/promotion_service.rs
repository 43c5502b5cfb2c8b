//! Brand promotions.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::brand::normalize_code;
use crate::domain::{Actor, CreatePromotion, Promotion, Role, UpdatePromotion};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PromotionService: Send + Sync {
    async fn create_promotion(&self, actor: &Actor, input: CreatePromotion) -> AppResult<Promotion>;

    async fn get_promotion(&self, actor: &Actor, id: Uuid) -> AppResult<Promotion>;

    async fn list_promotions(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<Promotion>>;

    async fn update_promotion(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdatePromotion,
    ) -> AppResult<Promotion>;
}

pub struct PromotionManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PromotionManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load(&self, actor: &Actor, id: Uuid) -> AppResult<Promotion> {
        let promotion = self.uow.promotions().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_brand(promotion.brand_id)?;
        Ok(promotion)
    }
}

#[async_trait]
impl<U: UnitOfWork> PromotionService for PromotionManager<U> {
    async fn create_promotion(&self, actor: &Actor, input: CreatePromotion) -> AppResult<Promotion> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let brand_id = actor.brand_id()?;

        let code = normalize_code(&input.code);
        if self.uow.promotions().find_by_code(brand_id, &code).await?.is_some() {
            return Err(AppError::conflict("Promotion code"));
        }

        let promotion = self
            .uow
            .promotions()
            .create(Promotion::new(brand_id, input)?)
            .await?;
        tracing::info!(promotion_id = %promotion.id, code = %promotion.code, "Promotion created");
        Ok(promotion)
    }

    async fn get_promotion(&self, actor: &Actor, id: Uuid) -> AppResult<Promotion> {
        self.load(actor, id).await
    }

    async fn list_promotions(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<Promotion>> {
        let page = self
            .uow
            .promotions()
            .list_by_brand(actor.brand_id()?, &params)
            .await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn update_promotion(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdatePromotion,
    ) -> AppResult<Promotion> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let mut promotion = self.load(actor, id).await?;
        promotion.apply(input)?;
        self.uow.promotions().update(promotion).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PromotionType;
    use crate::infra::repositories::MockPromotionRepository;
    use crate::services::testing::TestUnitOfWork;
    use chrono::{Duration, Utc};

    fn input() -> CreatePromotion {
        CreatePromotion {
            code: "summer10".into(),
            name: "Summer".into(),
            description: None,
            promotion_type: PromotionType::Percent,
            value: 10.0,
            max_discount: Some(20_000.0),
            min_condition_amount: None,
            start_date: Utc::now() - Duration::days(1),
            end_date: Utc::now() + Duration::days(30),
        }
    }

    fn manager(brand_id: Uuid) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::BrandManager,
            brand_id: Some(brand_id),
            store_id: None,
        }
    }

    #[tokio::test]
    async fn create_promotion_normalizes_code() {
        let brand_id = Uuid::new_v4();
        let mut promotions = MockPromotionRepository::new();
        promotions
            .expect_find_by_code()
            .withf(|_, code| code == "SUMMER10")
            .returning(|_, _| Ok(None));
        promotions.expect_create().returning(Ok);

        let service = PromotionManager::new(Arc::new(
            TestUnitOfWork::default().with_promotions(promotions),
        ));
        let created = service.create_promotion(&manager(brand_id), input()).await.unwrap();
        assert_eq!(created.code, "SUMMER10");
        assert_eq!(created.brand_id, brand_id);
    }

    #[tokio::test]
    async fn update_keeps_terms_valid() {
        let brand_id = Uuid::new_v4();
        let existing = Promotion::new(brand_id, input()).unwrap();
        let id = existing.id;
        let mut promotions = MockPromotionRepository::new();
        promotions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        promotions.expect_update().never();

        let service = PromotionManager::new(Arc::new(
            TestUnitOfWork::default().with_promotions(promotions),
        ));
        let update = UpdatePromotion {
            value: Some(150.0),
            ..Default::default()
        };
        let result = service.update_promotion(&manager(brand_id), id, update).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
