//! Variant option groups and their product assignments.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::menu_service::MenuService;
use super::product_service::ensure_brand_products;
use crate::domain::{
    Actor, AssignProducts, CreateVariant, Role, UpdateVariant, Variant, VariantDetail,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VariantService: Send + Sync {
    async fn create_variant(&self, actor: &Actor, input: CreateVariant) -> AppResult<Variant>;

    async fn get_variant(&self, actor: &Actor, id: Uuid) -> AppResult<VariantDetail>;

    async fn list_variants(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<Variant>>;

    async fn update_variant(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateVariant,
    ) -> AppResult<Variant>;

    /// Replace the products offering this variant.
    async fn assign_variant_products(
        &self,
        actor: &Actor,
        id: Uuid,
        input: AssignProducts,
    ) -> AppResult<VariantDetail>;
}

pub struct VariantManager<U: UnitOfWork> {
    uow: Arc<U>,
    menus: Arc<dyn MenuService>,
}

impl<U: UnitOfWork> VariantManager<U> {
    pub fn new(uow: Arc<U>, menus: Arc<dyn MenuService>) -> Self {
        Self { uow, menus }
    }

    async fn load(&self, actor: &Actor, id: Uuid) -> AppResult<Variant> {
        let variant = self.uow.variants().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_brand(variant.brand_id)?;
        Ok(variant)
    }
}

#[async_trait]
impl<U: UnitOfWork> VariantService for VariantManager<U> {
    async fn create_variant(&self, actor: &Actor, input: CreateVariant) -> AppResult<Variant> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let variant = Variant::new(actor.brand_id()?, input)?;
        let variant = self.uow.variants().create(variant).await?;
        self.menus.invalidate_store_menus().await;
        Ok(variant)
    }

    async fn get_variant(&self, actor: &Actor, id: Uuid) -> AppResult<VariantDetail> {
        let variant = self.load(actor, id).await?;
        let product_ids = self.uow.variants().product_ids(variant.id).await?;
        Ok(VariantDetail {
            variant,
            product_ids,
        })
    }

    async fn list_variants(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<Variant>> {
        let page = self
            .uow
            .variants()
            .list_by_brand(actor.brand_id()?, &params)
            .await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn update_variant(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateVariant,
    ) -> AppResult<Variant> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let mut variant = self.load(actor, id).await?;
        variant.apply(input)?;
        let variant = self.uow.variants().update(variant).await?;
        self.menus.invalidate_store_menus().await;
        Ok(variant)
    }

    async fn assign_variant_products(
        &self,
        actor: &Actor,
        id: Uuid,
        input: AssignProducts,
    ) -> AppResult<VariantDetail> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let variant = self.load(actor, id).await?;

        let ids = input.unique_ids();
        ensure_brand_products(self.uow.products().as_ref(), variant.brand_id, &ids).await?;
        self.uow
            .variants()
            .assign_products(variant.id, ids.clone())
            .await?;
        self.menus.invalidate_store_menus().await;

        tracing::debug!(variant_id = %variant.id, products = ids.len(), "Variant products assigned");
        Ok(VariantDetail {
            variant,
            product_ids: ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::{MockProductRepository, MockVariantRepository};
    use crate::services::menu_service::MockMenuService;
    use crate::services::testing::TestUnitOfWork;

    fn menus(invalidations: usize) -> Arc<MockMenuService> {
        let mut menus = MockMenuService::new();
        menus
            .expect_invalidate_store_menus()
            .times(invalidations)
            .return_const(());
        Arc::new(menus)
    }

    fn sugar(brand_id: Uuid) -> Variant {
        Variant::new(
            brand_id,
            CreateVariant {
                name: "Sugar".into(),
                options: vec!["None".into(), "Normal".into()],
                display_order: None,
            },
        )
        .unwrap()
    }

    fn manager(brand_id: Uuid) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::BrandAdmin,
            brand_id: Some(brand_id),
            store_id: None,
        }
    }

    #[tokio::test]
    async fn assignment_with_no_products_clears_mapping() {
        let brand_id = Uuid::new_v4();
        let variant = sugar(brand_id);
        let variant_id = variant.id;

        let mut variants = MockVariantRepository::new();
        variants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(variant.clone())));
        variants
            .expect_assign_products()
            .withf(move |id, ids| *id == variant_id && ids.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));
        let mut products = MockProductRepository::new();
        products.expect_find_many().never();

        let uow = TestUnitOfWork::default()
            .with_variants(variants)
            .with_products(products);
        let service = VariantManager::new(Arc::new(uow), menus(1));

        let detail = service
            .assign_variant_products(
                &manager(brand_id),
                variant_id,
                AssignProducts {
                    product_ids: vec![],
                },
            )
            .await
            .unwrap();
        assert!(detail.product_ids.is_empty());
    }

    #[tokio::test]
    async fn variant_of_another_brand_is_hidden() {
        let variant = sugar(Uuid::new_v4());
        let variant_id = variant.id;
        let mut variants = MockVariantRepository::new();
        variants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(variant.clone())));

        let service = VariantManager::new(
            Arc::new(TestUnitOfWork::default().with_variants(variants)),
            menus(0),
        );
        let result = service.get_variant(&manager(Uuid::new_v4()), variant_id).await;
        assert!(matches!(result, Err(crate::errors::AppError::Forbidden)));
    }
}
