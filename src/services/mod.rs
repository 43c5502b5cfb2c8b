//! Application services layer - Use cases and business logic.
//!
//! Services check who is calling, orchestrate domain rules and reach the
//! database through the Unit of Work. Handlers only see the traits.

mod account_service;
mod auth_service;
mod blog_post_service;
mod brand_service;
pub mod container;
mod menu_service;
mod order_service;
mod product_service;
mod promotion_service;
mod store_service;
mod transaction_service;
mod user_service;
mod variant_service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthService, Authenticator, Claims, LoginRequest, TokenResponse};
pub use blog_post_service::{BlogPostManager, BlogPostService};
pub use brand_service::{BrandManager, BrandService};
pub use menu_service::{MenuManager, MenuService};
pub use order_service::{resolve_lines, OrderManager, OrderService};
pub use product_service::{ProductManager, ProductService};
pub use promotion_service::{PromotionManager, PromotionService};
pub use store_service::{StoreManager, StoreService};
pub use transaction_service::{TransactionManager, TransactionService};
pub use user_service::{UserManager, UserService};
pub use variant_service::{VariantManager, VariantService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

#[cfg(any(test, feature = "test-utils"))]
pub use {
    account_service::MockAccountService, auth_service::MockAuthService,
    blog_post_service::MockBlogPostService, brand_service::MockBrandService,
    menu_service::MockMenuService, order_service::MockOrderService,
    product_service::MockProductService, promotion_service::MockPromotionService,
    store_service::MockStoreService, transaction_service::MockTransactionService,
    user_service::MockUserService, variant_service::MockVariantService,
};
