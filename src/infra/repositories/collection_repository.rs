//! Collection repository, including product membership.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain, into_domain_opt, into_domain_page};
use super::entities::collection::{self, ActiveModel, Entity as CollectionEntity};
use super::entities::collection_product::{self, Entity as CollectionProductEntity};
use crate::domain::Collection;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Collection>>;

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Collection>>;

    async fn create(&self, collection: Collection) -> AppResult<Collection>;

    async fn update(&self, collection: Collection) -> AppResult<Collection>;

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Collection>, u64)>;

    /// Replace the member products
    async fn set_products(&self, collection_id: Uuid, product_ids: Vec<Uuid>) -> AppResult<()>;

    async fn product_ids(&self, collection_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Every collection of the brand with its member product ids
    async fn list_with_products(&self, brand_id: Uuid) -> AppResult<Vec<(Collection, Vec<Uuid>)>>;
}

pub struct CollectionStore {
    db: DatabaseConnection,
}

impl CollectionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CollectionRepository for CollectionStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Collection>> {
        into_domain_opt(CollectionEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Collection>> {
        let row = CollectionEntity::find()
            .filter(collection::Column::BrandId.eq(brand_id))
            .filter(collection::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        into_domain_opt(row)
    }

    async fn create(&self, collection: Collection) -> AppResult<Collection> {
        let model = ActiveModel::from(&collection).insert(&self.db).await?;
        Collection::try_from(model)
    }

    async fn update(&self, collection: Collection) -> AppResult<Collection> {
        let model = ActiveModel::from(&collection).update(&self.db).await?;
        Collection::try_from(model)
    }

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Collection>, u64)> {
        let select = CollectionEntity::find()
            .filter(collection::Column::BrandId.eq(brand_id))
            .order_by_asc(collection::Column::Name);
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }

    async fn set_products(&self, collection_id: Uuid, product_ids: Vec<Uuid>) -> AppResult<()> {
        let txn = self.db.begin().await?;
        CollectionProductEntity::delete_many()
            .filter(collection_product::Column::CollectionId.eq(collection_id))
            .exec(&txn)
            .await?;
        if !product_ids.is_empty() {
            let rows = product_ids
                .into_iter()
                .map(|product_id| collection_product::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    collection_id: Set(collection_id),
                    product_id: Set(product_id),
                });
            CollectionProductEntity::insert_many(rows).exec(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn product_ids(&self, collection_id: Uuid) -> AppResult<Vec<Uuid>> {
        let rows = CollectionProductEntity::find()
            .filter(collection_product::Column::CollectionId.eq(collection_id))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|row| row.product_id).collect())
    }

    async fn list_with_products(&self, brand_id: Uuid) -> AppResult<Vec<(Collection, Vec<Uuid>)>> {
        let collections: Vec<Collection> = into_domain(
            CollectionEntity::find()
                .filter(collection::Column::BrandId.eq(brand_id))
                .order_by_asc(collection::Column::Name)
                .all(&self.db)
                .await?,
        )?;
        if collections.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = collections.iter().map(|c| c.id).collect();
        let mut members: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in CollectionProductEntity::find()
            .filter(collection_product::Column::CollectionId.is_in(ids))
            .all(&self.db)
            .await?
        {
            members.entry(row.collection_id).or_default().push(row.product_id);
        }

        Ok(collections
            .into_iter()
            .map(|c| {
                let product_ids = members.remove(&c.id).unwrap_or_default();
                (c, product_ids)
            })
            .collect())
    }
}
