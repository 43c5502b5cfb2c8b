use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::BlogPost;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub image: Option<String>,
    pub priority: i32,
    pub is_dialog: bool,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for BlogPost {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(BlogPost {
            id: model.id,
            brand_id: model.brand_id,
            title: model.title,
            content: model.content,
            image: model.image,
            priority: model.priority,
            is_dialog: model.is_dialog,
            status: parse_column("status", &model.status)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&BlogPost> for ActiveModel {
    fn from(post: &BlogPost) -> Self {
        ActiveModel {
            id: Set(post.id),
            brand_id: Set(post.brand_id),
            title: Set(post.title.clone()),
            content: Set(post.content.clone()),
            image: Set(post.image.clone()),
            priority: Set(post.priority),
            is_dialog: Set(post.is_dialog),
            status: Set(post.status.as_str().to_string()),
            created_at: Set(post.created_at),
            updated_at: Set(post.updated_at),
        }
    }
}
