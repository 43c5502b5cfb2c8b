//! Unit of Work: repository access plus atomic multi-aggregate writes.
//!
//! Reads go through the shared `*Store` repositories. Workflows touching
//! several aggregates (checkout, order status changes, wallet top-ups,
//! loyalty sync) run inside `transaction`, where `TransactionContext`
//! hands out repositories bound to the open database transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{
    brand, member, order, order_detail, order_history, order_user, promotion_order, session,
    transaction,
};
use super::repositories::{
    AccountRepository, AccountStore, BlogPostRepository, BlogPostStore, BrandRepository,
    BrandStore, CategoryRepository, CategoryStore, CollectionRepository, CollectionStore,
    MenuRepository, MenuStore, OrderRepository, OrderStore, ProductRepository, ProductStore,
    PromotionRepository, PromotionStore, SessionRepository, SessionStore, StoreRepository,
    StoreStore, TransactionRepository, TransactionStore, UserRepository, UserStore,
    VariantRepository, VariantStore,
};
use crate::domain::{
    Brand, NewOrder, Order, OrderHistory, OrderUser, Session, Transaction, User,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method; tests
/// provide their own implementation backed by repository mocks.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    fn brands(&self) -> Arc<dyn BrandRepository>;

    fn stores(&self) -> Arc<dyn StoreRepository>;

    fn sessions(&self) -> Arc<dyn SessionRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn collections(&self) -> Arc<dyn CollectionRepository>;

    fn variants(&self) -> Arc<dyn VariantRepository>;

    fn menus(&self) -> Arc<dyn MenuRepository>;

    fn promotions(&self) -> Arc<dyn PromotionRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;

    fn users(&self) -> Arc<dyn UserRepository>;

    fn transactions(&self) -> Arc<dyn TransactionRepository>;

    fn blog_posts(&self) -> Arc<dyn BlogPostRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    ///
    /// Committed when the closure succeeds, rolled back when it fails.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Repository access within an open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn orders(&self) -> TxOrderRepository<'_> {
        TxOrderRepository { txn: self.txn }
    }

    pub fn sessions(&self) -> TxSessionRepository<'_> {
        TxSessionRepository { txn: self.txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    pub fn brands(&self) -> TxBrandRepository<'_> {
        TxBrandRepository { txn: self.txn }
    }

    pub fn transactions(&self) -> TxTransactionRepository<'_> {
        TxTransactionRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    accounts: Arc<AccountStore>,
    brands: Arc<BrandStore>,
    stores: Arc<StoreStore>,
    sessions: Arc<SessionStore>,
    categories: Arc<CategoryStore>,
    products: Arc<ProductStore>,
    collections: Arc<CollectionStore>,
    variants: Arc<VariantStore>,
    menus: Arc<MenuStore>,
    promotions: Arc<PromotionStore>,
    orders: Arc<OrderStore>,
    users: Arc<UserStore>,
    transactions: Arc<TransactionStore>,
    blog_posts: Arc<BlogPostStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            accounts: Arc::new(AccountStore::new(db.clone())),
            brands: Arc::new(BrandStore::new(db.clone())),
            stores: Arc::new(StoreStore::new(db.clone())),
            sessions: Arc::new(SessionStore::new(db.clone())),
            categories: Arc::new(CategoryStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db.clone())),
            collections: Arc::new(CollectionStore::new(db.clone())),
            variants: Arc::new(VariantStore::new(db.clone())),
            menus: Arc::new(MenuStore::new(db.clone())),
            promotions: Arc::new(PromotionStore::new(db.clone())),
            orders: Arc::new(OrderStore::new(db.clone())),
            users: Arc::new(UserStore::new(db.clone())),
            transactions: Arc::new(TransactionStore::new(db.clone())),
            blog_posts: Arc::new(BlogPostStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.accounts.clone()
    }

    fn brands(&self) -> Arc<dyn BrandRepository> {
        self.brands.clone()
    }

    fn stores(&self) -> Arc<dyn StoreRepository> {
        self.stores.clone()
    }

    fn sessions(&self) -> Arc<dyn SessionRepository> {
        self.sessions.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn collections(&self) -> Arc<dyn CollectionRepository> {
        self.collections.clone()
    }

    fn variants(&self) -> Arc<dyn VariantRepository> {
        self.variants.clone()
    }

    fn menus(&self) -> Arc<dyn MenuRepository> {
        self.menus.clone()
    }

    fn promotions(&self) -> Arc<dyn PromotionRepository> {
        self.promotions.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionRepository> {
        self.transactions.clone()
    }

    fn blog_posts(&self) -> Arc<dyn BlogPostRepository> {
        self.blog_posts.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Order writes inside a transaction.
pub struct TxOrderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxOrderRepository<'a> {
    /// Persist a freshly assembled order with every row hanging off it.
    pub async fn insert(&self, new_order: &NewOrder) -> AppResult<()> {
        order::ActiveModel::from(&new_order.order).insert(self.txn).await?;

        if !new_order.details.is_empty() {
            order_detail::Entity::insert_many(
                new_order.details.iter().map(order_detail::ActiveModel::from),
            )
            .exec(self.txn)
            .await?;
        }
        if !new_order.promotions.is_empty() {
            promotion_order::Entity::insert_many(
                new_order.promotions.iter().map(promotion_order::ActiveModel::from),
            )
            .exec(self.txn)
            .await?;
        }
        if let Some(customer) = &new_order.customer {
            order_user::ActiveModel::from(customer).insert(self.txn).await?;
        }
        order_history::ActiveModel::from(&new_order.history)
            .insert(self.txn)
            .await?;
        Ok(())
    }

    /// Row-locked read
    pub async fn find_for_update(&self, id: Uuid) -> AppResult<Option<Order>> {
        order::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?
            .map(Order::try_from)
            .transpose()
    }

    pub async fn update(&self, order: &Order) -> AppResult<Order> {
        let model = order::ActiveModel::from(order).update(self.txn).await?;
        Order::try_from(model)
    }

    pub async fn append_history(&self, history: &OrderHistory) -> AppResult<()> {
        order_history::ActiveModel::from(history).insert(self.txn).await?;
        Ok(())
    }

    pub async fn customer(&self, order_id: Uuid) -> AppResult<Option<OrderUser>> {
        let row = order_user::Entity::find()
            .filter(order_user::Column::OrderId.eq(order_id))
            .lock_exclusive()
            .one(self.txn)
            .await?;
        Ok(row.map(OrderUser::from))
    }

    /// Flag a customer row as reconciled with the loyalty service.
    pub async fn mark_synced(&self, customer_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        let row = order_user::Entity::find_by_id(customer_id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;
        let mut active: order_user::ActiveModel = row.into();
        active.is_sync = Set(true);
        active.synced_at = Set(Some(at));
        active.update(self.txn).await?;
        Ok(())
    }
}

/// Session accounting inside a transaction.
pub struct TxSessionRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxSessionRepository<'a> {
    pub async fn find_for_update(&self, id: Uuid) -> AppResult<Option<Session>> {
        let row = session::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?;
        Ok(row.map(Session::from))
    }

    pub async fn update(&self, session: &Session) -> AppResult<Session> {
        let model = session::ActiveModel::from(session).update(self.txn).await?;
        Ok(Session::from(model))
    }
}

/// Member balance and points inside a transaction.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    pub async fn find_for_update(&self, id: Uuid) -> AppResult<Option<User>> {
        member::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn update(&self, user: &User) -> AppResult<User> {
        let model = member::ActiveModel::from(user).update(self.txn).await?;
        User::try_from(model)
    }
}

/// Brand balance inside a transaction.
pub struct TxBrandRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxBrandRepository<'a> {
    pub async fn find_for_update(&self, id: Uuid) -> AppResult<Option<Brand>> {
        brand::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?
            .map(Brand::try_from)
            .transpose()
    }

    pub async fn update(&self, brand: &Brand) -> AppResult<Brand> {
        let model = brand::ActiveModel::from(brand).update(self.txn).await?;
        Brand::try_from(model)
    }
}

/// Ledger writes inside a transaction.
pub struct TxTransactionRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxTransactionRepository<'a> {
    pub async fn record(&self, entry: &Transaction) -> AppResult<Transaction> {
        let model = transaction::ActiveModel::from(entry).insert(self.txn).await?;
        Transaction::try_from(model)
    }
}

/// Shorthand for running a transactional block.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
