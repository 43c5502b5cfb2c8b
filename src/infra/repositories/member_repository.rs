//! Member (brand customer) repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain_opt, into_domain_page};
use super::entities::member::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{User, UserFilter};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_phone(&self, brand_id: Uuid, phone: &str) -> AppResult<Option<User>>;

    async fn create(&self, user: User) -> AppResult<User>;

    async fn update(&self, user: User) -> AppResult<User>;

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        filter: UserFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;
}

pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        into_domain_opt(UserEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_phone(&self, brand_id: Uuid, phone: &str) -> AppResult<Option<User>> {
        let row = UserEntity::find()
            .filter(member::Column::BrandId.eq(brand_id))
            .filter(member::Column::Phone.eq(phone))
            .one(&self.db)
            .await?;
        into_domain_opt(row)
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let model = ActiveModel::from(&user).insert(&self.db).await?;
        User::try_from(model)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let model = ActiveModel::from(&user).update(&self.db).await?;
        User::try_from(model)
    }

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        filter: UserFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        let mut select = UserEntity::find()
            .filter(member::Column::BrandId.eq(brand_id))
            .order_by_desc(member::Column::CreatedAt);
        if let Some(phone) = filter.phone.filter(|p| !p.trim().is_empty()) {
            select = select.filter(member::Column::Phone.contains(phone.trim()));
        }
        if let Some(name) = filter.name.filter(|n| !n.trim().is_empty()) {
            select = select.filter(member::Column::FullName.contains(name.trim()));
        }
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }
}
