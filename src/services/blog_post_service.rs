//! Brand news for the member app.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::brand::normalize_code;
use crate::domain::{Actor, BlogPost, CreateBlogPost, Role, UpdateBlogPost};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BlogPostService: Send + Sync {
    async fn create_post(&self, actor: &Actor, input: CreateBlogPost) -> AppResult<BlogPost>;

    async fn get_post(&self, actor: &Actor, id: Uuid) -> AppResult<BlogPost>;

    async fn list_posts(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<BlogPost>>;

    async fn update_post(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateBlogPost,
    ) -> AppResult<BlogPost>;

    async fn delete_post(&self, actor: &Actor, id: Uuid) -> AppResult<()>;

    /// Active posts of a brand, highest priority first. No authentication.
    async fn list_public(&self, brand_code: String) -> AppResult<Vec<BlogPost>>;
}

pub struct BlogPostManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BlogPostManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn load_for_edit(&self, actor: &Actor, id: Uuid) -> AppResult<BlogPost> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let post = self.uow.blog_posts().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_brand(post.brand_id)?;
        Ok(post)
    }
}

#[async_trait]
impl<U: UnitOfWork> BlogPostService for BlogPostManager<U> {
    async fn create_post(&self, actor: &Actor, input: CreateBlogPost) -> AppResult<BlogPost> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let post = BlogPost::new(actor.brand_id()?, input);
        self.uow.blog_posts().create(post).await
    }

    async fn get_post(&self, actor: &Actor, id: Uuid) -> AppResult<BlogPost> {
        let post = self.uow.blog_posts().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_brand(post.brand_id)?;
        Ok(post)
    }

    async fn list_posts(
        &self,
        actor: &Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<BlogPost>> {
        let page = self
            .uow
            .blog_posts()
            .list_by_brand(actor.brand_id()?, &params)
            .await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn update_post(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateBlogPost,
    ) -> AppResult<BlogPost> {
        let mut post = self.load_for_edit(actor, id).await?;
        post.apply(input);
        self.uow.blog_posts().update(post).await
    }

    async fn delete_post(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let post = self.load_for_edit(actor, id).await?;
        if !self.uow.blog_posts().delete(post.id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(post_id = %post.id, deleted_by = %actor.id, "Blog post deleted");
        Ok(())
    }

    async fn list_public(&self, brand_code: String) -> AppResult<Vec<BlogPost>> {
        let brand = self
            .uow
            .brands()
            .find_by_code(&normalize_code(&brand_code))
            .await?
            .filter(|brand| brand.is_active())
            .ok_or_not_found()?;
        self.uow.blog_posts().list_active_by_brand(brand.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Brand, CreateBrand, EntityStatus};
    use crate::infra::repositories::{MockBlogPostRepository, MockBrandRepository};
    use crate::services::testing::TestUnitOfWork;

    fn brand(status: EntityStatus) -> Brand {
        let mut brand = Brand::new(CreateBrand {
            name: "Passio".into(),
            brand_code: "PASSIO".into(),
            email: None,
            phone: None,
            address: None,
            pic_url: None,
        });
        brand.status = status;
        brand
    }

    #[tokio::test]
    async fn public_listing_resolves_brand_code() {
        let brand = brand(EntityStatus::Active);
        let brand_id = brand.id;
        let post = BlogPost::new(
            brand_id,
            CreateBlogPost {
                title: "Grand opening".into(),
                content: "Half price all week".into(),
                image: None,
                priority: Some(5),
                is_dialog: Some(true),
            },
        );

        let mut brands = MockBrandRepository::new();
        brands
            .expect_find_by_code()
            .withf(|code| code == "PASSIO")
            .returning(move |_| Ok(Some(brand.clone())));
        let mut posts = MockBlogPostRepository::new();
        posts
            .expect_list_active_by_brand()
            .withf(move |id| *id == brand_id)
            .returning(move |_| Ok(vec![post.clone()]));

        let service = BlogPostManager::new(Arc::new(
            TestUnitOfWork::default().with_brands(brands).with_blog_posts(posts),
        ));
        let listed = service.list_public(" passio ".into()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].is_dialog);
    }

    #[tokio::test]
    async fn inactive_brand_has_no_public_posts() {
        let brand = brand(EntityStatus::Deactivate);
        let mut brands = MockBrandRepository::new();
        brands
            .expect_find_by_code()
            .returning(move |_| Ok(Some(brand.clone())));

        let service = BlogPostManager::new(Arc::new(TestUnitOfWork::default().with_brands(brands)));
        let result = service.list_public("PASSIO".into()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn store_staff_cannot_delete_posts() {
        let service = BlogPostManager::new(Arc::new(TestUnitOfWork::default()));
        let staff = Actor {
            id: Uuid::new_v4(),
            role: Role::StoreManager,
            brand_id: Some(Uuid::new_v4()),
            store_id: Some(Uuid::new_v4()),
        };
        let result = service.delete_post(&staff, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
