//! Brand (tenant) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::EntityStatus;

/// Tenant owning stores, products, menus and promotions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    /// Upper-case, unique across the system
    pub brand_code: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub pic_url: Option<String>,
    pub status: EntityStatus,
    /// Money received through member top-ups
    pub brand_balance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Brand {
    pub fn new(input: CreateBrand) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            brand_code: normalize_code(&input.brand_code),
            email: input.email,
            phone: input.phone,
            address: input.address,
            pic_url: input.pic_url,
            status: EntityStatus::Active,
            brand_balance: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Money a member paid into their wallet.
    pub fn credit_balance(&mut self, amount: f64) {
        self.brand_balance = super::pricing::round_money(self.brand_balance + amount);
        self.updated_at = Utc::now();
    }

    pub fn apply(&mut self, update: UpdateBrand) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
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
        if update.pic_url.is_some() {
            self.pic_url = update.pic_url;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Codes are compared case-insensitively; store them trimmed and upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBrand {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Passio Coffee")]
    pub name: String,
    #[validate(length(min = 2, max = 20, message = "Brand code must be 2-20 characters"))]
    #[schema(example = "PASSIO")]
    pub brand_code: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub pic_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBrand {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub pic_url: Option<String>,
    pub status: Option<EntityStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_brand_normalizes_code() {
        let brand = Brand::new(CreateBrand {
            name: " Passio ".into(),
            brand_code: " passio ".into(),
            email: None,
            phone: None,
            address: None,
            pic_url: None,
        });
        assert_eq!(brand.brand_code, "PASSIO");
        assert_eq!(brand.name, "Passio");
        assert!(brand.is_active());
        assert_eq!(brand.brand_balance, 0.0);
    }

    #[test]
    fn update_only_touches_given_fields() {
        let mut brand = Brand::new(CreateBrand {
            name: "Passio".into(),
            brand_code: "PASSIO".into(),
            email: Some("hi@passio.vn".into()),
            phone: None,
            address: None,
            pic_url: None,
        });
        brand.apply(UpdateBrand {
            status: Some(EntityStatus::Deactivate),
            ..Default::default()
        });
        assert_eq!(brand.email.as_deref(), Some("hi@passio.vn"));
        assert!(!brand.is_active());
    }
}
