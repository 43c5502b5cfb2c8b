//! Unit of work backed by repository mocks.
//!
//! Repositories without expectations panic when called. `transaction`
//! always fails, so workflows are tested up to the point they would write;
//! the steps run inside transactions are pure and tested on their own.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{
    AccountRepository, BlogPostRepository, BrandRepository, CategoryRepository,
    CollectionRepository, MenuRepository, MockAccountRepository, MockBlogPostRepository,
    MockBrandRepository, MockCategoryRepository, MockCollectionRepository, MockMenuRepository,
    MockOrderRepository, MockProductRepository, MockPromotionRepository, MockSessionRepository,
    MockStoreRepository, MockTransactionRepository, MockUserRepository, MockVariantRepository,
    OrderRepository, ProductRepository, PromotionRepository, SessionRepository, StoreRepository,
    TransactionRepository, UserRepository, VariantRepository,
};
use crate::infra::{TransactionContext, UnitOfWork};

macro_rules! test_unit_of_work {
    ($( $field:ident, $with:ident: $mock:ident => $repo:ident ),+ $(,)?) => {
        pub struct TestUnitOfWork {
            $( $field: Arc<$mock>, )+
        }

        impl Default for TestUnitOfWork {
            fn default() -> Self {
                Self {
                    $( $field: Arc::new($mock::new()), )+
                }
            }
        }

        impl TestUnitOfWork {
            $(
                pub fn $with(mut self, repo: $mock) -> Self {
                    self.$field = Arc::new(repo);
                    self
                }
            )+
        }

        #[async_trait]
        impl UnitOfWork for TestUnitOfWork {
            $(
                fn $field(&self) -> Arc<dyn $repo> {
                    self.$field.clone()
                }
            )+

            async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
            where
                F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                        Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                    > + Send,
                T: Send,
            {
                Err(AppError::internal("Transactions not supported in test mock"))
            }
        }
    };
}

test_unit_of_work! {
    accounts, with_accounts: MockAccountRepository => AccountRepository,
    brands, with_brands: MockBrandRepository => BrandRepository,
    stores, with_stores: MockStoreRepository => StoreRepository,
    sessions, with_sessions: MockSessionRepository => SessionRepository,
    categories, with_categories: MockCategoryRepository => CategoryRepository,
    products, with_products: MockProductRepository => ProductRepository,
    collections, with_collections: MockCollectionRepository => CollectionRepository,
    variants, with_variants: MockVariantRepository => VariantRepository,
    menus, with_menus: MockMenuRepository => MenuRepository,
    promotions, with_promotions: MockPromotionRepository => PromotionRepository,
    orders, with_orders: MockOrderRepository => OrderRepository,
    users, with_users: MockUserRepository => UserRepository,
    transactions, with_transactions: MockTransactionRepository => TransactionRepository,
    blog_posts, with_blog_posts: MockBlogPostRepository => BlogPostRepository,
}
