//! Brand catalog: products, categories and collections.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::menu_service::MenuService;
use crate::domain::brand::normalize_code;
use crate::domain::{
    Actor, AssignProducts, Category, Collection, CollectionDetail, CreateCategory,
    CreateCollection, CreateProduct, Product, ProductFilter, ProductType, Role, UpdateCategory,
    UpdateCollection, UpdateProduct,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::ProductRepository;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    // Products
    async fn create_product(&self, actor: &Actor, input: CreateProduct) -> AppResult<Product>;

    async fn get_product(&self, actor: &Actor, id: Uuid) -> AppResult<Product>;

    async fn list_products(
        &self,
        actor: &Actor,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Product>>;

    async fn update_product(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateProduct,
    ) -> AppResult<Product>;

    // Categories
    async fn create_category(&self, actor: &Actor, input: CreateCategory) -> AppResult<Category>;

    async fn get_category(&self, actor: &Actor, id: Uuid) -> AppResult<Category>;

    async fn list_categories(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<Category>>;

    async fn update_category(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateCategory,
    ) -> AppResult<Category>;

    // Collections
    async fn create_collection(
        &self,
        actor: &Actor,
        input: CreateCollection,
    ) -> AppResult<Collection>;

    async fn get_collection(&self, actor: &Actor, id: Uuid) -> AppResult<CollectionDetail>;

    async fn list_collections(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<Collection>>;

    async fn update_collection(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateCollection,
    ) -> AppResult<Collection>;

    async fn set_collection_products(
        &self,
        actor: &Actor,
        id: Uuid,
        input: AssignProducts,
    ) -> AppResult<CollectionDetail>;
}

/// Check that every id names a product of `brand_id`.
pub(crate) async fn ensure_brand_products(
    products: &dyn ProductRepository,
    brand_id: Uuid,
    ids: &[Uuid],
) -> AppResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = products.find_many(ids.to_vec()).await?;
    let known: HashSet<Uuid> = found
        .iter()
        .filter(|product| product.brand_id == brand_id)
        .map(|product| product.id)
        .collect();
    if let Some(missing) = ids.iter().find(|id| !known.contains(id)) {
        return Err(AppError::validation(format!(
            "Product {} does not belong to this brand",
            missing
        )));
    }
    Ok(found)
}

/// Catalog writes drop the cached store menus, which embed products,
/// categories and collections.
pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
    menus: Arc<dyn MenuService>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>, menus: Arc<dyn MenuService>) -> Self {
        Self { uow, menus }
    }

    async fn brand_category(&self, brand_id: Uuid, id: Uuid) -> AppResult<Category> {
        let category = self
            .uow
            .categories()
            .find_by_id(id)
            .await?
            .filter(|category| category.brand_id == brand_id)
            .ok_or_else(|| AppError::validation("Category does not exist in this brand"))?;
        Ok(category)
    }

    async fn load_product(&self, actor: &Actor, id: Uuid) -> AppResult<Product> {
        let product = self.uow.products().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_brand(product.brand_id)?;
        Ok(product)
    }

    async fn load_category(&self, actor: &Actor, id: Uuid) -> AppResult<Category> {
        let category = self.uow.categories().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_brand(category.brand_id)?;
        Ok(category)
    }

    async fn load_collection(&self, actor: &Actor, id: Uuid) -> AppResult<Collection> {
        let collection = self.uow.collections().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_brand(collection.brand_id)?;
        Ok(collection)
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn create_product(&self, actor: &Actor, input: CreateProduct) -> AppResult<Product> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let brand_id = actor.brand_id()?;

        let code = normalize_code(&input.code);
        if self.uow.products().find_by_code(brand_id, &code).await?.is_some() {
            return Err(AppError::conflict("Product code"));
        }

        let product = Product::new(brand_id, input)?;
        let category = self.brand_category(brand_id, product.category_id).await?;
        product.check_category(&category)?;
        if let Some(parent_id) = product.parent_product_id {
            let parent = self
                .uow
                .products()
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::validation("Parent product does not exist"))?;
            product.check_parent(&parent)?;
        }

        let product = self.uow.products().create(product).await?;
        self.menus.invalidate_store_menus().await;
        tracing::info!(product_id = %product.id, code = %product.code, "Product created");
        Ok(product)
    }

    async fn get_product(&self, actor: &Actor, id: Uuid) -> AppResult<Product> {
        self.load_product(actor, id).await
    }

    async fn list_products(
        &self,
        actor: &Actor,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Product>> {
        let brand_id = actor.brand_id()?;
        let page = self.uow.products().list(brand_id, filter, &params).await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn update_product(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateProduct,
    ) -> AppResult<Product> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let mut product = self.load_product(actor, id).await?;

        let category_changed = input
            .category_id
            .is_some_and(|category_id| category_id != product.category_id);
        product.apply(input)?;
        if category_changed {
            let category = self.brand_category(product.brand_id, product.category_id).await?;
            product.check_category(&category)?;
        }

        let product = self.uow.products().update(product).await?;
        self.menus.invalidate_store_menus().await;
        Ok(product)
    }

    async fn create_category(&self, actor: &Actor, input: CreateCategory) -> AppResult<Category> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let brand_id = actor.brand_id()?;

        let code = normalize_code(&input.code);
        if self.uow.categories().find_by_code(brand_id, &code).await?.is_some() {
            return Err(AppError::conflict("Category code"));
        }
        let category = self
            .uow
            .categories()
            .create(Category::new(brand_id, input))
            .await?;
        self.menus.invalidate_store_menus().await;
        Ok(category)
    }

    async fn get_category(&self, actor: &Actor, id: Uuid) -> AppResult<Category> {
        self.load_category(actor, id).await
    }

    async fn list_categories(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<Category>> {
        let brand_id = actor.brand_id()?;
        let page = self.uow.categories().list_by_brand(brand_id, &params).await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn update_category(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateCategory,
    ) -> AppResult<Category> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let mut category = self.load_category(actor, id).await?;
        category.apply(input);
        let category = self.uow.categories().update(category).await?;
        self.menus.invalidate_store_menus().await;
        Ok(category)
    }

    async fn create_collection(
        &self,
        actor: &Actor,
        input: CreateCollection,
    ) -> AppResult<Collection> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let brand_id = actor.brand_id()?;

        let code = normalize_code(&input.code);
        if self.uow.collections().find_by_code(brand_id, &code).await?.is_some() {
            return Err(AppError::conflict("Collection code"));
        }
        let collection = self
            .uow
            .collections()
            .create(Collection::new(brand_id, input))
            .await?;
        self.menus.invalidate_store_menus().await;
        Ok(collection)
    }

    async fn get_collection(&self, actor: &Actor, id: Uuid) -> AppResult<CollectionDetail> {
        let collection = self.load_collection(actor, id).await?;
        let product_ids = self.uow.collections().product_ids(collection.id).await?;
        Ok(CollectionDetail {
            collection,
            product_ids,
        })
    }

    async fn list_collections(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<Collection>> {
        let brand_id = actor.brand_id()?;
        let page = self.uow.collections().list_by_brand(brand_id, &params).await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn update_collection(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateCollection,
    ) -> AppResult<Collection> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let mut collection = self.load_collection(actor, id).await?;
        collection.apply(input);
        let collection = self.uow.collections().update(collection).await?;
        self.menus.invalidate_store_menus().await;
        Ok(collection)
    }

    async fn set_collection_products(
        &self,
        actor: &Actor,
        id: Uuid,
        input: AssignProducts,
    ) -> AppResult<CollectionDetail> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let collection = self.load_collection(actor, id).await?;

        let ids = input.unique_ids();
        let products =
            ensure_brand_products(self.uow.products().as_ref(), collection.brand_id, &ids).await?;
        if products
            .iter()
            .any(|product| product.product_type == ProductType::Extra)
        {
            return Err(AppError::validation("Collections cannot hold EXTRA products"));
        }

        self.uow
            .collections()
            .set_products(collection.id, ids.clone())
            .await?;
        self.menus.invalidate_store_menus().await;
        Ok(CollectionDetail {
            collection,
            product_ids: ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryType, EntityStatus};
    use crate::infra::repositories::{
        MockCategoryRepository, MockCollectionRepository, MockProductRepository,
    };
    use crate::services::menu_service::MockMenuService;
    use crate::services::testing::TestUnitOfWork;

    /// Menu service expecting `times` cache invalidations.
    fn menus(times: usize) -> Arc<MockMenuService> {
        let mut menus = MockMenuService::new();
        menus.expect_invalidate_store_menus().times(times).return_const(());
        Arc::new(menus)
    }

    fn manager(brand_id: Uuid) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::BrandManager,
            brand_id: Some(brand_id),
            store_id: None,
        }
    }

    fn category(brand_id: Uuid, category_type: CategoryType) -> Category {
        Category::new(
            brand_id,
            CreateCategory {
                code: "drinks".into(),
                name: "Drinks".into(),
                category_type,
                display_order: None,
                description: None,
                pic_url: None,
            },
        )
    }

    fn product_input(category_id: Uuid, product_type: ProductType) -> CreateProduct {
        CreateProduct {
            code: "tra-dao".into(),
            name: "Tra dao".into(),
            category_id,
            product_type,
            parent_product_id: None,
            description: None,
            pic_url: None,
            size: None,
            selling_price: 35_000.0,
            historical_price: None,
            discount_price: None,
            display_order: None,
        }
    }

    #[tokio::test]
    async fn create_product_checks_category_type() {
        let brand_id = Uuid::new_v4();
        let extras = category(brand_id, CategoryType::Extra);
        let extras_id = extras.id;

        let mut products = MockProductRepository::new();
        products.expect_find_by_code().returning(|_, _| Ok(None));
        products.expect_create().never();
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .returning(move |_| Ok(Some(extras.clone())));

        let uow = TestUnitOfWork::default()
            .with_products(products)
            .with_categories(categories);
        let service = ProductManager::new(Arc::new(uow), menus(0));

        let result = service
            .create_product(&manager(brand_id), product_input(extras_id, ProductType::Single))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn create_product_in_matching_category() {
        let brand_id = Uuid::new_v4();
        let drinks = category(brand_id, CategoryType::Normal);
        let drinks_id = drinks.id;

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_code()
            .withf(|_, code| code == "TRA-DAO")
            .returning(|_, _| Ok(None));
        products.expect_create().returning(Ok);
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .returning(move |_| Ok(Some(drinks.clone())));

        let uow = TestUnitOfWork::default()
            .with_products(products)
            .with_categories(categories);
        let service = ProductManager::new(Arc::new(uow), menus(1));

        let product = service
            .create_product(&manager(brand_id), product_input(drinks_id, ProductType::Single))
            .await
            .unwrap();
        assert_eq!(product.brand_id, brand_id);
        assert_eq!(product.code, "TRA-DAO");
    }

    #[tokio::test]
    async fn staff_cannot_edit_catalog() {
        let service = ProductManager::new(Arc::new(TestUnitOfWork::default()), menus(0));
        let staff = Actor {
            role: Role::Staff,
            store_id: Some(Uuid::new_v4()),
            ..manager(Uuid::new_v4())
        };
        let result = service
            .create_product(&staff, product_input(Uuid::new_v4(), ProductType::Single))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn collection_rejects_foreign_products() {
        let brand_id = Uuid::new_v4();
        let collection = Collection::new(
            brand_id,
            CreateCollection {
                code: "best".into(),
                name: "Best sellers".into(),
                description: None,
                pic_url: None,
            },
        );
        let collection_id = collection.id;
        let foreign = Product::new(
            Uuid::new_v4(),
            product_input(Uuid::new_v4(), ProductType::Single),
        )
        .unwrap();
        let foreign_id = foreign.id;

        let mut collections = MockCollectionRepository::new();
        collections
            .expect_find_by_id()
            .returning(move |_| Ok(Some(collection.clone())));
        collections.expect_set_products().never();
        let mut products = MockProductRepository::new();
        products
            .expect_find_many()
            .returning(move |_| Ok(vec![foreign.clone()]));

        let uow = TestUnitOfWork::default()
            .with_collections(collections)
            .with_products(products);
        let service = ProductManager::new(Arc::new(uow), menus(0));

        let result = service
            .set_collection_products(
                &manager(brand_id),
                collection_id,
                AssignProducts {
                    product_ids: vec![foreign_id],
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn deactivating_a_product_drops_cached_menus() {
        let brand_id = Uuid::new_v4();
        let drinks = category(brand_id, CategoryType::Normal);
        let product = Product::new(brand_id, product_input(drinks.id, ProductType::Single)).unwrap();
        let product_id = product.id;

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        products
            .expect_update()
            .withf(|product| product.status == EntityStatus::Deactivate)
            .times(1)
            .returning(Ok);

        let service = ProductManager::new(
            Arc::new(TestUnitOfWork::default().with_products(products)),
            menus(1),
        );
        let updated = service
            .update_product(
                &manager(brand_id),
                product_id,
                UpdateProduct {
                    status: Some(EntityStatus::Deactivate),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, EntityStatus::Deactivate);
    }

    #[tokio::test]
    async fn category_edits_drop_cached_menus() {
        let brand_id = Uuid::new_v4();
        let drinks = category(brand_id, CategoryType::Normal);
        let drinks_id = drinks.id;

        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .returning(move |_| Ok(Some(drinks.clone())));
        categories.expect_update().times(1).returning(Ok);

        let service = ProductManager::new(
            Arc::new(TestUnitOfWork::default().with_categories(categories)),
            menus(1),
        );
        service
            .update_category(
                &manager(brand_id),
                drinks_id,
                UpdateCategory {
                    status: Some(EntityStatus::Deactivate),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }
}
