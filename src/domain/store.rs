//! Store (point-of-sale location) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::brand::normalize_code;
use super::common::EntityStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Store {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    /// Unique within the brand; prefixes invoice numbers
    pub code: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub wifi_name: Option<String>,
    pub wifi_password: Option<String>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn new(brand_id: Uuid, input: CreateStore) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            brand_id,
            name: input.name.trim().to_string(),
            short_name: input.short_name,
            code: normalize_code(&input.code),
            email: input.email,
            phone: input.phone,
            address: input.address,
            wifi_name: input.wifi_name,
            wifi_password: input.wifi_password,
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn apply(&mut self, update: UpdateStore) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if update.short_name.is_some() {
            self.short_name = update.short_name;
        }
        if update.email.is_some() {
            self.email = update.email;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.address.is_some() {
            self.address = update.address;
        }
        if update.wifi_name.is_some() {
            self.wifi_name = update.wifi_name;
        }
        if update.wifi_password.is_some() {
            self.wifi_password = update.wifi_password;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStore {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Passio Nguyen Hue")]
    pub name: String,
    pub short_name: Option<String>,
    #[validate(length(min = 2, max = 20, message = "Store code must be 2-20 characters"))]
    #[schema(example = "PNH01")]
    pub code: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub wifi_name: Option<String>,
    pub wifi_password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStore {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub short_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub wifi_name: Option<String>,
    pub wifi_password: Option<String>,
    pub status: Option<EntityStatus>,
}
