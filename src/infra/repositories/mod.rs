//! Repository layer - Data access abstraction
//!
//! One trait per aggregate with a SeaORM-backed `*Store` implementation.
//! Multi-aggregate writes go through the unit of work instead.

mod account_repository;
mod base;
mod blog_post_repository;
mod brand_repository;
mod category_repository;
mod collection_repository;
pub(crate) mod entities;
mod member_repository;
mod menu_repository;
mod order_repository;
mod product_repository;
mod promotion_repository;
mod session_repository;
mod store_repository;
mod transaction_repository;
mod variant_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use blog_post_repository::{BlogPostRepository, BlogPostStore};
pub use brand_repository::{BrandRepository, BrandStore};
pub use category_repository::{CategoryRepository, CategoryStore};
pub use collection_repository::{CollectionRepository, CollectionStore};
pub use member_repository::{UserRepository, UserStore};
pub use menu_repository::{MenuRepository, MenuStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use promotion_repository::{PromotionRepository, PromotionStore};
pub use session_repository::{SessionRepository, SessionStore};
pub use store_repository::{StoreRepository, StoreStore};
pub use transaction_repository::{TransactionRepository, TransactionStore};
pub use variant_repository::{VariantRepository, VariantStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use blog_post_repository::MockBlogPostRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use brand_repository::MockBrandRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use collection_repository::MockCollectionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use member_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use menu_repository::MockMenuRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use promotion_repository::MockPromotionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use session_repository::MockSessionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use store_repository::MockStoreRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use transaction_repository::MockTransactionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use variant_repository::MockVariantRepository;
