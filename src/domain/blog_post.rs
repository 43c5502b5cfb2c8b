//! Brand news shown in the member app.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::EntityStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlogPost {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    /// Higher is listed first
    pub priority: i32,
    /// Shown as a popup when the app opens
    pub is_dialog: bool,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    pub fn new(brand_id: Uuid, input: CreateBlogPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            brand_id,
            title: input.title,
            content: input.content,
            image: input.image,
            priority: input.priority.unwrap_or(0),
            is_dialog: input.is_dialog.unwrap_or(false),
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: UpdateBlogPost) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(image) = update.image {
            self.image = Some(image);
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(is_dialog) = update.is_dialog {
            self.is_dialog = is_dialog;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBlogPost {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub image: Option<String>,
    pub priority: Option<i32>,
    pub is_dialog: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBlogPost {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub priority: Option<i32>,
    pub is_dialog: Option<bool>,
    pub status: Option<EntityStatus>,
}
