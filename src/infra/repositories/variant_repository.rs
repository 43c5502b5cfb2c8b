//! Variant repository, including product assignment.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain, into_domain_opt, into_domain_page};
use super::entities::variant::{self, ActiveModel, Entity as VariantEntity};
use super::entities::variant_product::{self, Entity as VariantProductEntity};
use crate::domain::Variant;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VariantRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Variant>>;

    async fn create(&self, variant: Variant) -> AppResult<Variant>;

    async fn update(&self, variant: Variant) -> AppResult<Variant>;

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Variant>, u64)>;

    /// Replace the products the variant applies to
    async fn assign_products(&self, variant_id: Uuid, product_ids: Vec<Uuid>) -> AppResult<()>;

    async fn product_ids(&self, variant_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Every variant of the brand with the product ids it applies to
    async fn list_with_products(&self, brand_id: Uuid) -> AppResult<Vec<(Variant, Vec<Uuid>)>>;
}

pub struct VariantStore {
    db: DatabaseConnection,
}

impl VariantStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VariantRepository for VariantStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Variant>> {
        into_domain_opt(VariantEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn create(&self, variant: Variant) -> AppResult<Variant> {
        let model = ActiveModel::from(&variant).insert(&self.db).await?;
        Variant::try_from(model)
    }

    async fn update(&self, variant: Variant) -> AppResult<Variant> {
        let model = ActiveModel::from(&variant).update(&self.db).await?;
        Variant::try_from(model)
    }

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Variant>, u64)> {
        let select = VariantEntity::find()
            .filter(variant::Column::BrandId.eq(brand_id))
            .order_by_asc(variant::Column::DisplayOrder);
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }

    async fn assign_products(&self, variant_id: Uuid, product_ids: Vec<Uuid>) -> AppResult<()> {
        let txn = self.db.begin().await?;
        VariantProductEntity::delete_many()
            .filter(variant_product::Column::VariantId.eq(variant_id))
            .exec(&txn)
            .await?;
        if !product_ids.is_empty() {
            let rows = product_ids
                .into_iter()
                .map(|product_id| variant_product::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    variant_id: Set(variant_id),
                    product_id: Set(product_id),
                });
            VariantProductEntity::insert_many(rows).exec(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn product_ids(&self, variant_id: Uuid) -> AppResult<Vec<Uuid>> {
        let rows = VariantProductEntity::find()
            .filter(variant_product::Column::VariantId.eq(variant_id))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|row| row.product_id).collect())
    }

    async fn list_with_products(&self, brand_id: Uuid) -> AppResult<Vec<(Variant, Vec<Uuid>)>> {
        let variants: Vec<Variant> = into_domain(
            VariantEntity::find()
                .filter(variant::Column::BrandId.eq(brand_id))
                .order_by_asc(variant::Column::DisplayOrder)
                .all(&self.db)
                .await?,
        )?;
        if variants.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = variants.iter().map(|v| v.id).collect();
        let mut mapped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in VariantProductEntity::find()
            .filter(variant_product::Column::VariantId.is_in(ids))
            .all(&self.db)
            .await?
        {
            mapped.entry(row.variant_id).or_default().push(row.product_id);
        }

        Ok(variants
            .into_iter()
            .map(|v| {
                let product_ids = mapped.remove(&v.id).unwrap_or_default();
                (v, product_ids)
            })
            .collect())
    }
}
