//! Brand members: customers with a wallet balance and loyalty points.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::account::{Actor, Role};
use super::brand::normalize_code;
use super::common::EntityStatus;
use super::pricing::round_money;
use crate::errors::{AppError, AppResult};

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{9,15}$").expect("phone pattern is valid"));

/// Normalize and check a phone number.
pub fn normalize_phone(phone: &str) -> AppResult<String> {
    let phone: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    if PHONE_REGEX.is_match(&phone) {
        Ok(phone)
    } else {
        Err(AppError::validation("Invalid phone number"))
    }
}

string_enum! {
    pub enum Gender {
        Male => "MALE",
        Female => "FEMALE",
        Other => "OTHER",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub point: i64,
    pub balance: f64,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(brand_id: Uuid, input: SignUpUser, password_hash: String) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            brand_id,
            phone: normalize_phone(&input.phone)?,
            password_hash,
            full_name: input.full_name,
            email: input.email,
            gender: input.gender,
            date_of_birth: input.date_of_birth,
            address: input.address,
            point: 0,
            balance: 0.0,
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: Role::User,
            brand_id: Some(self.brand_id),
            store_id: None,
        }
    }

    /// Profile fields only; password changes go through the service.
    pub fn apply(&mut self, update: &UpdateUser) {
        if let Some(full_name) = &update.full_name {
            self.full_name = full_name.clone();
        }
        if let Some(email) = &update.email {
            self.email = Some(email.clone());
        }
        if let Some(gender) = update.gender {
            self.gender = Some(gender);
        }
        if let Some(date_of_birth) = update.date_of_birth {
            self.date_of_birth = Some(date_of_birth);
        }
        if let Some(address) = &update.address {
            self.address = Some(address.clone());
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }

    pub fn credit_balance(&mut self, amount: f64) -> AppResult<()> {
        if amount <= 0.0 {
            return Err(AppError::validation("Amount must be positive"));
        }
        self.balance = round_money(self.balance + amount);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn debit_balance(&mut self, amount: f64) -> AppResult<()> {
        if amount < 0.0 {
            return Err(AppError::validation("Amount cannot be negative"));
        }
        if self.balance < amount {
            return Err(AppError::rule("Insufficient wallet balance"));
        }
        self.balance = round_money(self.balance - amount);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn credit_points(&mut self, points: i64) {
        self.point = self.point.saturating_add(points.max(0));
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub phone: String,
    pub full_name: String,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub point: i64,
    pub balance: f64,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            brand_id: user.brand_id,
            phone: user.phone,
            full_name: user.full_name,
            email: user.email,
            gender: user.gender,
            date_of_birth: user.date_of_birth,
            address: user.address,
            point: user.point,
            balance: user.balance,
            status: user.status,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignUpUser {
    #[schema(example = "PASSIO")]
    pub brand_code: String,
    #[validate(length(min = 9, max = 20, message = "Phone must be 9-20 characters"))]
    #[schema(example = "0901234567")]
    pub phone: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl SignUpUser {
    pub fn brand_code(&self) -> String {
        normalize_code(&self.brand_code)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UserLogin {
    pub brand_code: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub status: Option<EntityStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TopUp {
    #[validate(range(min = 1.0, message = "Top-up amount must be positive"))]
    #[schema(example = 100000.0)]
    pub amount: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    pub phone: Option<String>,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> User {
        User::new(
            Uuid::new_v4(),
            SignUpUser {
                brand_code: "passio".into(),
                phone: "090 123 4567".into(),
                password: "member-pass".into(),
                full_name: "Tran Thi B".into(),
                email: None,
                gender: Some(Gender::Female),
                date_of_birth: None,
                address: None,
            },
            "hash".into(),
        )
        .unwrap()
    }

    #[test]
    fn phone_is_normalized() {
        assert_eq!(member().phone, "0901234567");
        assert!(normalize_phone("12ab").is_err());
        assert_eq!(normalize_phone("+84901234567").unwrap(), "+84901234567");
    }

    #[test]
    fn wallet_movements() {
        let mut user = member();
        user.credit_balance(100_000.0).unwrap();
        user.debit_balance(40_000.5).unwrap();
        assert_eq!(user.balance, 59_999.5);

        let err = user.debit_balance(60_000.0).unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
        assert!(user.credit_balance(0.0).is_err());
    }

    #[test]
    fn points_only_increase() {
        let mut user = member();
        user.credit_points(25);
        user.credit_points(-10);
        assert_eq!(user.point, 25);
    }

    #[test]
    fn actor_is_a_brand_member() {
        let user = member();
        let actor = user.actor();
        assert_eq!(actor.role, Role::User);
        assert_eq!(actor.brand_id, Some(user.brand_id));
    }
}
