//! Menus, menu pricing and per-store menu resolution.
//!
//! Resolved store menus are cached in Redis for a short TTL and dropped
//! whenever any menu changes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::brand::normalize_code;
use crate::domain::menu::select_menu;
use crate::domain::{
    Actor, ApplyMenuStores, BusinessClock, CreateMenu, Menu, MenuCatalog, MenuDetail,
    MenuProduct, Role, Store, UpdateMenu, UpsertMenuProducts,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Cache, UnitOfWork};
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MenuService: Send + Sync {
    async fn create_menu(&self, actor: &Actor, input: CreateMenu) -> AppResult<Menu>;

    async fn get_menu(&self, actor: &Actor, id: Uuid) -> AppResult<Menu>;

    async fn list_menus(&self, actor: &Actor, params: PaginationParams)
        -> AppResult<Paginated<Menu>>;

    async fn update_menu(&self, actor: &Actor, id: Uuid, input: UpdateMenu) -> AppResult<Menu>;

    /// Add products to a menu or re-price the ones already listed.
    async fn upsert_menu_products(
        &self,
        actor: &Actor,
        menu_id: Uuid,
        input: UpsertMenuProducts,
    ) -> AppResult<Vec<MenuProduct>>;

    async fn remove_menu_product(
        &self,
        actor: &Actor,
        menu_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<()>;

    async fn list_menu_products(&self, actor: &Actor, menu_id: Uuid) -> AppResult<Vec<MenuProduct>>;

    async fn apply_menu_to_stores(
        &self,
        actor: &Actor,
        menu_id: Uuid,
        input: ApplyMenuStores,
    ) -> AppResult<()>;

    /// What `store_id` sells at `now`, as seen by `actor`.
    async fn get_menu_detail_from_store(
        &self,
        actor: &Actor,
        store_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<MenuDetail>;

    /// Resolve the menu of an already authorized store.
    async fn resolve_store_menu(&self, store: &Store, now: DateTime<Utc>) -> AppResult<MenuDetail>;

    /// Forget resolved store menus after a catalog change.
    async fn invalidate_store_menus(&self);
}

pub struct MenuManager<U: UnitOfWork> {
    uow: Arc<U>,
    cache: Option<Cache>,
    clock: BusinessClock,
}

impl<U: UnitOfWork> MenuManager<U> {
    pub fn new(uow: Arc<U>, cache: Option<Cache>, clock: BusinessClock) -> Self {
        Self { uow, cache, clock }
    }

    async fn load(&self, actor: &Actor, id: Uuid) -> AppResult<Menu> {
        let menu = self.uow.menus().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_brand(menu.brand_id)?;
        Ok(menu)
    }

    async fn load_for_edit(&self, actor: &Actor, id: Uuid) -> AppResult<Menu> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        self.load(actor, id).await
    }

    /// Cache failures never fail a request; the entries expire on their own.
    async fn invalidate_cache(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.invalidate_store_menus().await {
                tracing::warn!(error = %e, "Failed to invalidate store menus");
            }
        }
    }

    async fn cached(&self, store_id: Uuid) -> Option<MenuDetail> {
        let cache = self.cache.as_ref()?;
        match cache.get_store_menu(store_id).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!(store_id = %store_id, error = %e, "Store menu cache read failed");
                None
            }
        }
    }

    async fn remember(&self, detail: &MenuDetail) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_store_menu(detail).await {
                tracing::warn!(store_id = %detail.store_id, error = %e, "Store menu cache write failed");
            }
        }
    }

    /// Listed products (plus their parents), categories, collections and variants.
    async fn catalog_of(&self, menu: &Menu) -> AppResult<MenuCatalog> {
        let menu_products = self.uow.menus().list_products(menu.id).await?;

        let listed: Vec<Uuid> = menu_products.iter().map(|entry| entry.product_id).collect();
        let mut products = self.uow.products().find_many(listed).await?;

        let known: HashSet<Uuid> = products.iter().map(|p| p.id).collect();
        let parents: Vec<Uuid> = products
            .iter()
            .filter_map(|p| p.parent_product_id)
            .filter(|id| !known.contains(id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if !parents.is_empty() {
            products.extend(self.uow.products().find_many(parents).await?);
        }

        let category_ids: Vec<Uuid> = products
            .iter()
            .map(|p| p.category_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let categories = self.uow.categories().find_many(category_ids).await?;
        let collections = self.uow.collections().list_with_products(menu.brand_id).await?;
        let variants = self.uow.variants().list_with_products(menu.brand_id).await?;

        Ok(MenuCatalog {
            menu_products,
            products,
            categories,
            collections,
            variants,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> MenuService for MenuManager<U> {
    async fn create_menu(&self, actor: &Actor, input: CreateMenu) -> AppResult<Menu> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let brand_id = actor.brand_id()?;

        let menu = Menu::new(brand_id, input, Some(actor.id))?;
        if menu.is_base() && self.uow.menus().find_base(brand_id).await?.is_some() {
            return Err(AppError::conflict("Base menu"));
        }
        if self.uow.menus().find_by_code(brand_id, &menu.code).await?.is_some() {
            return Err(AppError::conflict("Menu code"));
        }

        let menu = self.uow.menus().create(menu).await?;
        tracing::info!(menu_id = %menu.id, priority = menu.priority, "Menu created");
        self.invalidate_cache().await;
        Ok(menu)
    }

    async fn get_menu(&self, actor: &Actor, id: Uuid) -> AppResult<Menu> {
        self.load(actor, id).await
    }

    async fn list_menus(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<Menu>> {
        let page = self
            .uow
            .menus()
            .list_by_brand(actor.brand_id()?, &params)
            .await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn update_menu(&self, actor: &Actor, id: Uuid, input: UpdateMenu) -> AppResult<Menu> {
        let mut menu = self.load_for_edit(actor, id).await?;

        if let Some(code) = &input.code {
            let code = normalize_code(code);
            let taken = self
                .uow
                .menus()
                .find_by_code(menu.brand_id, &code)
                .await?
                .is_some_and(|other| other.id != menu.id);
            if taken {
                return Err(AppError::conflict("Menu code"));
            }
        }

        menu.apply(input)?;
        let menu = self.uow.menus().update(menu).await?;
        self.invalidate_cache().await;
        Ok(menu)
    }

    async fn upsert_menu_products(
        &self,
        actor: &Actor,
        menu_id: Uuid,
        input: UpsertMenuProducts,
    ) -> AppResult<Vec<MenuProduct>> {
        let menu = self.load_for_edit(actor, menu_id).await?;

        let mut seen = HashSet::new();
        if let Some(dup) = input.products.iter().find(|p| !seen.insert(p.product_id)) {
            return Err(AppError::validation(format!(
                "Product {} is listed twice",
                dup.product_id
            )));
        }

        let ids: Vec<Uuid> = input.products.iter().map(|p| p.product_id).collect();
        let products = self.uow.products().find_many(ids).await?;
        let entries = input
            .products
            .iter()
            .map(|line| {
                let product = products
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .ok_or_else(|| {
                        AppError::validation(format!("Product {} does not exist", line.product_id))
                    })?;
                MenuProduct::from_input(&menu, line, product)
            })
            .collect::<AppResult<Vec<_>>>()?;

        self.uow.menus().upsert_products(menu.id, entries).await?;
        self.invalidate_cache().await;
        self.uow.menus().list_products(menu.id).await
    }

    async fn remove_menu_product(
        &self,
        actor: &Actor,
        menu_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<()> {
        let menu = self.load_for_edit(actor, menu_id).await?;
        if !self.uow.menus().remove_product(menu.id, product_id).await? {
            return Err(AppError::NotFound);
        }
        self.invalidate_cache().await;
        Ok(())
    }

    async fn list_menu_products(&self, actor: &Actor, menu_id: Uuid) -> AppResult<Vec<MenuProduct>> {
        let menu = self.load(actor, menu_id).await?;
        self.uow.menus().list_products(menu.id).await
    }

    async fn apply_menu_to_stores(
        &self,
        actor: &Actor,
        menu_id: Uuid,
        input: ApplyMenuStores,
    ) -> AppResult<()> {
        let menu = self.load_for_edit(actor, menu_id).await?;

        let requested: HashSet<Uuid> = input.store_ids.iter().copied().collect();
        let stores = self
            .uow
            .stores()
            .find_many(requested.iter().copied().collect())
            .await?;
        let owned = stores
            .iter()
            .filter(|store| store.brand_id == menu.brand_id)
            .count();
        if owned != requested.len() {
            return Err(AppError::validation(
                "Every store must exist and belong to the menu's brand",
            ));
        }

        self.uow
            .menus()
            .apply_to_stores(menu.id, requested.into_iter().collect())
            .await?;
        self.invalidate_cache().await;
        Ok(())
    }

    async fn get_menu_detail_from_store(
        &self,
        actor: &Actor,
        store_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<MenuDetail> {
        let store = self.uow.stores().find_by_id(store_id).await?.ok_or_not_found()?;
        actor.ensure_store(store.brand_id, store.id)?;
        self.resolve_store_menu(&store, now).await
    }

    async fn resolve_store_menu(&self, store: &Store, now: DateTime<Utc>) -> AppResult<MenuDetail> {
        if let Some(detail) = self.cached(store.id).await {
            return Ok(detail);
        }

        let mut candidates = self.uow.menus().list_for_store(store.id).await?;
        if let Some(base) = self.uow.menus().find_base(store.brand_id).await? {
            if !candidates.iter().any(|menu| menu.id == base.id) {
                candidates.push(base);
            }
        }

        let local = self.clock.local(now);
        let menu = select_menu(&candidates, local).ok_or(AppError::NotFound)?;
        tracing::debug!(store_id = %store.id, menu_id = %menu.id, "Store menu resolved");

        let catalog = self.catalog_of(menu).await?;
        let detail = MenuDetail::build(menu, store.id, catalog);
        self.remember(&detail).await;
        Ok(detail)
    }

    async fn invalidate_store_menus(&self) {
        self.invalidate_cache().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Category, CategoryType, CreateCategory, CreateProduct, CreateStore, MenuProductInput,
        Product, ProductType,
    };
    use crate::infra::repositories::{
        MockCategoryRepository, MockCollectionRepository, MockMenuRepository,
        MockProductRepository, MockStoreRepository, MockVariantRepository,
    };
    use crate::services::testing::TestUnitOfWork;
    use chrono::{NaiveTime, TimeZone};

    fn manager(brand_id: Uuid) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::BrandManager,
            brand_id: Some(brand_id),
            store_id: None,
        }
    }

    fn menu(brand_id: Uuid, code: &str, priority: i32, window: Option<(u32, u32)>) -> Menu {
        let hm = |h: u32| NaiveTime::from_hms_opt(h, 0, 0);
        Menu::new(
            brand_id,
            CreateMenu {
                code: code.into(),
                priority,
                date_filter: None,
                start_time: window.and_then(|(start, _)| hm(start)),
                end_time: window.and_then(|(_, end)| hm(end)),
            },
            None,
        )
        .unwrap()
    }

    fn store(brand_id: Uuid) -> Store {
        Store::new(
            brand_id,
            CreateStore {
                name: "Store".into(),
                short_name: None,
                code: "S01".into(),
                email: None,
                phone: None,
                address: None,
                wifi_name: None,
                wifi_password: None,
            },
        )
    }

    fn product(brand_id: Uuid, category_id: Uuid) -> Product {
        Product::new(
            brand_id,
            CreateProduct {
                code: "latte".into(),
                name: "Latte".into(),
                category_id,
                product_type: ProductType::Single,
                parent_product_id: None,
                description: None,
                pic_url: None,
                size: None,
                selling_price: 45_000.0,
                historical_price: None,
                discount_price: None,
                display_order: None,
            },
        )
        .unwrap()
    }

    fn service(uow: TestUnitOfWork) -> MenuManager<TestUnitOfWork> {
        MenuManager::new(Arc::new(uow), None, BusinessClock::new(7).unwrap())
    }

    #[tokio::test]
    async fn second_base_menu_conflicts() {
        let brand_id = Uuid::new_v4();
        let existing = menu(brand_id, "BASE", 0, None);
        let mut menus = MockMenuRepository::new();
        menus
            .expect_find_base()
            .returning(move |_| Ok(Some(existing.clone())));
        menus.expect_create().never();

        let service = service(TestUnitOfWork::default().with_menus(menus));
        let input = CreateMenu {
            code: "base-2".into(),
            priority: 0,
            date_filter: None,
            start_time: None,
            end_time: None,
        };
        let result = service.create_menu(&manager(brand_id), input).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn store_menu_prefers_available_higher_priority() {
        let brand_id = Uuid::new_v4();
        let store = store(brand_id);
        let base = menu(brand_id, "BASE", 0, None);
        // 07:00-11:00 local, i.e. 00:00-04:00 UTC at +07:00
        let breakfast = menu(brand_id, "BREAKFAST", 5, Some((7, 11)));
        let breakfast_id = breakfast.id;

        let category = Category::new(
            brand_id,
            CreateCategory {
                code: "coffee".into(),
                name: "Coffee".into(),
                category_type: CategoryType::Normal,
                display_order: None,
                description: None,
                pic_url: None,
            },
        );
        let latte = product(brand_id, category.id);
        let listing = MenuProduct::from_input(
            &breakfast,
            &MenuProductInput {
                product_id: latte.id,
                selling_price: Some(39_000.0),
                discount_price: None,
                historical_price: None,
            },
            &latte,
        )
        .unwrap();

        let mut menus = MockMenuRepository::new();
        menus
            .expect_list_for_store()
            .returning(move |_| Ok(vec![breakfast.clone()]));
        menus
            .expect_find_base()
            .returning(move |_| Ok(Some(base.clone())));
        menus
            .expect_list_products()
            .withf(move |id| *id == breakfast_id)
            .returning(move |_| Ok(vec![listing.clone()]));
        let mut products = MockProductRepository::new();
        products
            .expect_find_many()
            .returning(move |_| Ok(vec![latte.clone()]));
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_many()
            .returning(move |_| Ok(vec![category.clone()]));
        let mut collections = MockCollectionRepository::new();
        collections.expect_list_with_products().returning(|_| Ok(vec![]));
        let mut variants = MockVariantRepository::new();
        variants.expect_list_with_products().returning(|_| Ok(vec![]));

        let service = service(
            TestUnitOfWork::default()
                .with_menus(menus)
                .with_products(products)
                .with_categories(categories)
                .with_collections(collections)
                .with_variants(variants),
        );

        let now = Utc.with_ymd_and_hms(2024, 6, 3, 2, 0, 0).unwrap();
        let detail = service.resolve_store_menu(&store, now).await.unwrap();
        assert_eq!(detail.menu_id, breakfast_id);
        assert_eq!(detail.products.len(), 1);
        assert_eq!(detail.products[0].selling_price, 39_000.0);
        assert_eq!(detail.categories.len(), 1);
    }

    #[tokio::test]
    async fn store_without_any_menu_is_not_found() {
        let brand_id = Uuid::new_v4();
        let mut menus = MockMenuRepository::new();
        menus.expect_list_for_store().returning(|_| Ok(vec![]));
        menus.expect_find_base().returning(|_| Ok(None));

        let service = service(TestUnitOfWork::default().with_menus(menus));
        let result = service.resolve_store_menu(&store(brand_id), Utc::now()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn menu_cannot_be_applied_to_foreign_store() {
        let brand_id = Uuid::new_v4();
        let special = menu(brand_id, "SPECIAL", 3, None);
        let special_id = special.id;
        let foreign = store(Uuid::new_v4());
        let foreign_id = foreign.id;

        let mut menus = MockMenuRepository::new();
        menus
            .expect_find_by_id()
            .returning(move |_| Ok(Some(special.clone())));
        menus.expect_apply_to_stores().never();
        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_many()
            .returning(move |_| Ok(vec![foreign.clone()]));

        let service = service(TestUnitOfWork::default().with_menus(menus).with_stores(stores));
        let result = service
            .apply_menu_to_stores(
                &manager(brand_id),
                special_id,
                ApplyMenuStores {
                    store_ids: vec![foreign_id],
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn duplicate_products_in_upsert_are_rejected() {
        let brand_id = Uuid::new_v4();
        let special = menu(brand_id, "SPECIAL", 3, None);
        let special_id = special.id;
        let mut menus = MockMenuRepository::new();
        menus
            .expect_find_by_id()
            .returning(move |_| Ok(Some(special.clone())));
        menus.expect_upsert_products().never();

        let service = service(TestUnitOfWork::default().with_menus(menus));
        let product_id = Uuid::new_v4();
        let line = || MenuProductInput {
            product_id,
            selling_price: None,
            discount_price: None,
            historical_price: None,
        };
        let result = service
            .upsert_menu_products(
                &manager(brand_id),
                special_id,
                UpsertMenuProducts {
                    products: vec![line(), line()],
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
