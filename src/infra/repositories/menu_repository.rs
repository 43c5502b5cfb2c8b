//! Menu repository: menus, their products and the stores they apply to.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain, into_domain_opt, into_domain_page};
use super::entities::menu::{self, ActiveModel, Entity as MenuEntity};
use super::entities::menu_product::{self, Entity as MenuProductEntity};
use super::entities::menu_store::{self, Entity as MenuStoreEntity};
use crate::domain::{EntityStatus, Menu, MenuProduct};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Menu>>;

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Menu>>;

    /// The priority-0 menu of a brand
    async fn find_base(&self, brand_id: Uuid) -> AppResult<Option<Menu>>;

    async fn create(&self, menu: Menu) -> AppResult<Menu>;

    async fn update(&self, menu: Menu) -> AppResult<Menu>;

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Menu>, u64)>;

    /// Active menus applied to a store
    async fn list_for_store(&self, store_id: Uuid) -> AppResult<Vec<Menu>>;

    /// Insert or replace the given products' entries on a menu
    async fn upsert_products(&self, menu_id: Uuid, entries: Vec<MenuProduct>) -> AppResult<()>;

    /// Returns false when the product wasn't on the menu
    async fn remove_product(&self, menu_id: Uuid, product_id: Uuid) -> AppResult<bool>;

    async fn list_products(&self, menu_id: Uuid) -> AppResult<Vec<MenuProduct>>;

    /// Link the menu to stores, skipping links that already exist
    async fn apply_to_stores(&self, menu_id: Uuid, store_ids: Vec<Uuid>) -> AppResult<()>;
}

pub struct MenuStore {
    db: DatabaseConnection,
}

impl MenuStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MenuRepository for MenuStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Menu>> {
        into_domain_opt(MenuEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_code(&self, brand_id: Uuid, code: &str) -> AppResult<Option<Menu>> {
        let row = MenuEntity::find()
            .filter(menu::Column::BrandId.eq(brand_id))
            .filter(menu::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        into_domain_opt(row)
    }

    async fn find_base(&self, brand_id: Uuid) -> AppResult<Option<Menu>> {
        let row = MenuEntity::find()
            .filter(menu::Column::BrandId.eq(brand_id))
            .filter(menu::Column::Priority.eq(0))
            .order_by_asc(menu::Column::CreatedAt)
            .one(&self.db)
            .await?;
        into_domain_opt(row)
    }

    async fn create(&self, menu: Menu) -> AppResult<Menu> {
        let model = ActiveModel::from(&menu).insert(&self.db).await?;
        Menu::try_from(model)
    }

    async fn update(&self, menu: Menu) -> AppResult<Menu> {
        let model = ActiveModel::from(&menu).update(&self.db).await?;
        Menu::try_from(model)
    }

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Menu>, u64)> {
        let select = MenuEntity::find()
            .filter(menu::Column::BrandId.eq(brand_id))
            .order_by_desc(menu::Column::Priority)
            .order_by_desc(menu::Column::CreatedAt);
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }

    async fn list_for_store(&self, store_id: Uuid) -> AppResult<Vec<Menu>> {
        let menu_ids: Vec<Uuid> = MenuStoreEntity::find()
            .filter(menu_store::Column::StoreId.eq(store_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.menu_id)
            .collect();
        if menu_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = MenuEntity::find()
            .filter(menu::Column::Id.is_in(menu_ids))
            .filter(menu::Column::Status.eq(EntityStatus::Active.as_str()))
            .all(&self.db)
            .await?;
        into_domain(rows)
    }

    async fn upsert_products(&self, menu_id: Uuid, entries: Vec<MenuProduct>) -> AppResult<()> {
        let txn = self.db.begin().await?;
        for entry in entries {
            let existing = MenuProductEntity::find()
                .filter(menu_product::Column::MenuId.eq(menu_id))
                .filter(menu_product::Column::ProductId.eq(entry.product_id))
                .one(&txn)
                .await?;
            match existing {
                Some(row) => {
                    let mut active: menu_product::ActiveModel = row.into();
                    active.selling_price = Set(entry.selling_price);
                    active.discount_price = Set(entry.discount_price);
                    active.historical_price = Set(entry.historical_price);
                    active.status = Set(entry.status.as_str().to_string());
                    active.updated_at = Set(Utc::now());
                    active.update(&txn).await?;
                }
                None => {
                    menu_product::ActiveModel::from(&entry).insert(&txn).await?;
                }
            }
        }
        txn.commit().await?;
        Ok(())
    }

    async fn remove_product(&self, menu_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        let result = MenuProductEntity::delete_many()
            .filter(menu_product::Column::MenuId.eq(menu_id))
            .filter(menu_product::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_products(&self, menu_id: Uuid) -> AppResult<Vec<MenuProduct>> {
        let rows = MenuProductEntity::find()
            .filter(menu_product::Column::MenuId.eq(menu_id))
            .all(&self.db)
            .await?;
        into_domain(rows)
    }

    async fn apply_to_stores(&self, menu_id: Uuid, store_ids: Vec<Uuid>) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let linked: Vec<Uuid> = MenuStoreEntity::find()
            .filter(menu_store::Column::MenuId.eq(menu_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|link| link.store_id)
            .collect();

        let mut fresh: Vec<Uuid> = store_ids
            .into_iter()
            .filter(|id| !linked.contains(id))
            .collect();
        fresh.sort();
        fresh.dedup();

        if !fresh.is_empty() {
            let rows = fresh.into_iter().map(|store_id| menu_store::ActiveModel {
                id: Set(Uuid::new_v4()),
                menu_id: Set(menu_id),
                store_id: Set(store_id),
            });
            MenuStoreEntity::insert_many(rows).exec(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }
}
