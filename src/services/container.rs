//! Service container - one place to reach every application service.
//!
//! Handlers depend on the `ServiceContainer` trait so tests can swap in
//! mocks, while `Services` wires the real managers over one `Persistence`.

use std::sync::Arc;

use super::{
    AccountManager, AccountService, AuthService, Authenticator, BlogPostManager,
    BlogPostService, BrandManager, BrandService, MenuManager, MenuService, OrderManager,
    OrderService, ProductManager, ProductService, PromotionManager, PromotionService,
    StoreManager, StoreService, TransactionManager, TransactionService, UserManager,
    UserService, VariantManager, VariantService,
};
use crate::config::Config;
use crate::infra::{Cache, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn brands(&self) -> Arc<dyn BrandService>;

    /// Stores and their sessions
    fn stores(&self) -> Arc<dyn StoreService>;

    /// Products, categories and collections
    fn products(&self) -> Arc<dyn ProductService>;

    fn variants(&self) -> Arc<dyn VariantService>;

    fn menus(&self) -> Arc<dyn MenuService>;

    fn promotions(&self) -> Arc<dyn PromotionService>;

    fn orders(&self) -> Arc<dyn OrderService>;

    /// Brand members
    fn users(&self) -> Arc<dyn UserService>;

    fn transactions(&self) -> Arc<dyn TransactionService>;

    fn blog_posts(&self) -> Arc<dyn BlogPostService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth: Arc<dyn AuthService>,
    accounts: Arc<dyn AccountService>,
    brands: Arc<dyn BrandService>,
    stores: Arc<dyn StoreService>,
    products: Arc<dyn ProductService>,
    variants: Arc<dyn VariantService>,
    menus: Arc<dyn MenuService>,
    promotions: Arc<dyn PromotionService>,
    orders: Arc<dyn OrderService>,
    users: Arc<dyn UserService>,
    transactions: Arc<dyn TransactionService>,
    blog_posts: Arc<dyn BlogPostService>,
}

impl Services {
    /// Wire every service over a database connection.
    ///
    /// Without a cache, store menus are resolved from the database on
    /// every request.
    pub fn from_parts(db: sea_orm::DatabaseConnection, cache: Option<Cache>, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let clock = config.business_clock();

        let menus: Arc<dyn MenuService> =
            Arc::new(MenuManager::new(uow.clone(), cache, clock));
        let orders = Arc::new(OrderManager::new(
            uow.clone(),
            menus.clone(),
            clock,
            config.vat_rate,
        ));

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            accounts: Arc::new(AccountManager::new(uow.clone())),
            brands: Arc::new(BrandManager::new(uow.clone())),
            stores: Arc::new(StoreManager::new(uow.clone())),
            products: Arc::new(ProductManager::new(uow.clone(), menus.clone())),
            variants: Arc::new(VariantManager::new(uow.clone(), menus.clone())),
            menus,
            promotions: Arc::new(PromotionManager::new(uow.clone())),
            orders,
            users: Arc::new(UserManager::new(uow.clone())),
            transactions: Arc::new(TransactionManager::new(uow.clone())),
            blog_posts: Arc::new(BlogPostManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.accounts.clone()
    }

    fn brands(&self) -> Arc<dyn BrandService> {
        self.brands.clone()
    }

    fn stores(&self) -> Arc<dyn StoreService> {
        self.stores.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.products.clone()
    }

    fn variants(&self) -> Arc<dyn VariantService> {
        self.variants.clone()
    }

    fn menus(&self) -> Arc<dyn MenuService> {
        self.menus.clone()
    }

    fn promotions(&self) -> Arc<dyn PromotionService> {
        self.promotions.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.orders.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionService> {
        self.transactions.clone()
    }

    fn blog_posts(&self) -> Arc<dyn BlogPostService> {
        self.blog_posts.clone()
    }
}
