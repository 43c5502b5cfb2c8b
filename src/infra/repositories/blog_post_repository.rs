//! Blog post repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::{fetch_page, into_domain, into_domain_opt, into_domain_page};
use super::entities::blog_post::{self, ActiveModel, Entity as BlogPostEntity};
use crate::domain::{BlogPost, EntityStatus};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BlogPost>>;

    async fn create(&self, post: BlogPost) -> AppResult<BlogPost>;

    async fn update(&self, post: BlogPost) -> AppResult<BlogPost>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<BlogPost>, u64)>;

    /// Active posts, highest priority first
    async fn list_active_by_brand(&self, brand_id: Uuid) -> AppResult<Vec<BlogPost>>;
}

pub struct BlogPostStore {
    db: DatabaseConnection,
}

impl BlogPostStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlogPostRepository for BlogPostStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BlogPost>> {
        into_domain_opt(BlogPostEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn create(&self, post: BlogPost) -> AppResult<BlogPost> {
        let model = ActiveModel::from(&post).insert(&self.db).await?;
        BlogPost::try_from(model)
    }

    async fn update(&self, post: BlogPost) -> AppResult<BlogPost> {
        let model = ActiveModel::from(&post).update(&self.db).await?;
        BlogPost::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = BlogPostEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_brand(
        &self,
        brand_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<BlogPost>, u64)> {
        let select = BlogPostEntity::find()
            .filter(blog_post::Column::BrandId.eq(brand_id))
            .order_by_desc(blog_post::Column::Priority)
            .order_by_desc(blog_post::Column::CreatedAt);
        into_domain_page(fetch_page(&self.db, select, params).await?)
    }

    async fn list_active_by_brand(&self, brand_id: Uuid) -> AppResult<Vec<BlogPost>> {
        let rows = BlogPostEntity::find()
            .filter(blog_post::Column::BrandId.eq(brand_id))
            .filter(blog_post::Column::Status.eq(EntityStatus::Active.as_str()))
            .order_by_desc(blog_post::Column::Priority)
            .order_by_desc(blog_post::Column::CreatedAt)
            .all(&self.db)
            .await?;
        into_domain(rows)
    }
}
