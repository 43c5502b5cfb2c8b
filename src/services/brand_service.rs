//! Brand (tenant) administration.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Actor, Brand, CreateBrand, Role, UpdateBrand};
use crate::domain::brand::normalize_code;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BrandService: Send + Sync {
    async fn create_brand(&self, actor: &Actor, input: CreateBrand) -> AppResult<Brand>;

    async fn get_brand(&self, actor: &Actor, id: Uuid) -> AppResult<Brand>;

    async fn list_brands(
        &self,
        actor: &Actor,
        name: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Brand>>;

    async fn update_brand(&self, actor: &Actor, id: Uuid, input: UpdateBrand) -> AppResult<Brand>;
}

pub struct BrandManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BrandManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> BrandService for BrandManager<U> {
    async fn create_brand(&self, actor: &Actor, input: CreateBrand) -> AppResult<Brand> {
        actor.require_any(&[Role::SystemAdmin])?;

        let code = normalize_code(&input.brand_code);
        if self.uow.brands().find_by_code(&code).await?.is_some() {
            return Err(AppError::conflict("Brand code"));
        }

        let brand = self.uow.brands().create(Brand::new(input)).await?;
        tracing::info!(brand_id = %brand.id, code = %brand.brand_code, "Brand created");
        Ok(brand)
    }

    async fn get_brand(&self, actor: &Actor, id: Uuid) -> AppResult<Brand> {
        actor.ensure_brand(id)?;
        self.uow.brands().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_brands(
        &self,
        actor: &Actor,
        name: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Brand>> {
        actor.require_any(&[Role::SystemAdmin])?;
        let page = self.uow.brands().list(name, &params).await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn update_brand(&self, actor: &Actor, id: Uuid, input: UpdateBrand) -> AppResult<Brand> {
        actor.require_any(&[Role::SystemAdmin, Role::BrandAdmin])?;
        actor.ensure_brand(id)?;
        if input.status.is_some() && !actor.is_system_admin() {
            return Err(AppError::Forbidden);
        }

        let mut brand = self.uow.brands().find_by_id(id).await?.ok_or_not_found()?;
        brand.apply(input);
        self.uow.brands().update(brand).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityStatus;
    use crate::infra::repositories::MockBrandRepository;
    use crate::services::testing::TestUnitOfWork;

    fn system_admin() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::SystemAdmin,
            brand_id: None,
            store_id: None,
        }
    }

    fn input(code: &str) -> CreateBrand {
        CreateBrand {
            name: "Passio".to_string(),
            brand_code: code.to_string(),
            email: None,
            phone: None,
            address: None,
            pic_url: None,
        }
    }

    #[tokio::test]
    async fn create_brand_rejects_taken_code() {
        let mut brands = MockBrandRepository::new();
        brands
            .expect_find_by_code()
            .withf(|code| code == "PASSIO")
            .returning(|_| Ok(Some(Brand::new(input("PASSIO")))));
        let service = BrandManager::new(Arc::new(TestUnitOfWork::default().with_brands(brands)));

        let result = service.create_brand(&system_admin(), input("passio")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn only_system_admin_creates_brands() {
        let service = BrandManager::new(Arc::new(TestUnitOfWork::default()));
        let admin = Actor {
            id: Uuid::new_v4(),
            role: Role::BrandAdmin,
            brand_id: Some(Uuid::new_v4()),
            store_id: None,
        };
        let result = service.create_brand(&admin, input("NEW")).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn brand_admin_cannot_deactivate_own_brand() {
        let brand_id = Uuid::new_v4();
        let service = BrandManager::new(Arc::new(TestUnitOfWork::default()));
        let admin = Actor {
            id: Uuid::new_v4(),
            role: Role::BrandAdmin,
            brand_id: Some(brand_id),
            store_id: None,
        };
        let update = UpdateBrand {
            status: Some(EntityStatus::Deactivate),
            ..Default::default()
        };
        let result = service.update_brand(&admin, brand_id, update).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn brand_admin_reads_only_own_brand() {
        let service = BrandManager::new(Arc::new(TestUnitOfWork::default()));
        let admin = Actor {
            id: Uuid::new_v4(),
            role: Role::BrandAdmin,
            brand_id: Some(Uuid::new_v4()),
            store_id: None,
        };
        let result = service.get_brand(&admin, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
