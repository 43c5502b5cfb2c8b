//! Staff accounts, roles and the authenticated actor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::EntityStatus;
use crate::errors::{AppError, AppResult};

string_enum! {
    /// Roles carried in access tokens
    pub enum Role {
        SystemAdmin => "SYSTEM_ADMIN",
        BrandAdmin => "BRAND_ADMIN",
        BrandManager => "BRAND_MANAGER",
        StoreManager => "STORE_MANAGER",
        Staff => "STAFF",
        /// Brand member (customer); never stored on an account
        User => "USER",
    }
}

impl Role {
    /// Staff allowed to manage a brand's catalog, menus and promotions
    pub const BRAND_MANAGERS: &'static [Role] = &[Role::BrandAdmin, Role::BrandManager];

    /// Staff working in stores, including brand-level staff
    pub const STORE_OPERATORS: &'static [Role] = &[
        Role::BrandAdmin,
        Role::BrandManager,
        Role::StoreManager,
        Role::Staff,
    ];

    /// Roles bound to a single store
    pub fn is_store_scoped(&self) -> bool {
        matches!(self, Role::StoreManager | Role::Staff)
    }

    /// Roles bound to a brand (every role except the system administrator)
    pub fn is_brand_scoped(&self) -> bool {
        !matches!(self, Role::SystemAdmin)
    }

    /// Whether an account with this role may create an account with `target`.
    pub fn can_create(&self, target: Role) -> bool {
        match self {
            Role::SystemAdmin => matches!(target, Role::BrandAdmin),
            Role::BrandAdmin => matches!(
                target,
                Role::BrandManager | Role::StoreManager | Role::Staff
            ),
            Role::BrandManager => matches!(target, Role::StoreManager | Role::Staff),
            Role::StoreManager => matches!(target, Role::Staff),
            Role::Staff | Role::User => false,
        }
    }
}

/// The authenticated caller, as decoded from the access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub brand_id: Option<Uuid>,
    pub store_id: Option<Uuid>,
}

impl Actor {
    pub fn is_system_admin(&self) -> bool {
        self.role == Role::SystemAdmin
    }

    /// Fail with Forbidden unless the actor holds one of `roles`.
    pub fn require_any(&self, roles: &[Role]) -> AppResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Brand the actor belongs to.
    pub fn brand_id(&self) -> AppResult<Uuid> {
        self.brand_id.ok_or(AppError::Forbidden)
    }

    /// System administrators see every brand; everybody else only their own.
    pub fn ensure_brand(&self, brand_id: Uuid) -> AppResult<()> {
        if self.is_system_admin() || self.brand_id == Some(brand_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Store-scoped roles are further limited to their own store.
    pub fn ensure_store(&self, brand_id: Uuid, store_id: Uuid) -> AppResult<()> {
        self.ensure_brand(brand_id)?;
        if self.role.is_store_scoped() && self.store_id != Some(store_id) {
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

/// Staff login account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub status: EntityStatus,
    pub brand_id: Option<Uuid>,
    pub store_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        username: String,
        password_hash: String,
        name: String,
        role: Role,
        brand_id: Option<Uuid>,
        store_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            name,
            role,
            status: EntityStatus::Active,
            brand_id,
            store_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
            brand_id: self.brand_id,
            store_id: self.store_id,
        }
    }
}

/// Account creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAccount {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    #[schema(example = "store01.cashier")]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Nguyen Van A")]
    pub name: String,
    pub role: Role,
    /// Required when a system administrator creates a brand administrator
    pub brand_id: Option<Uuid>,
    /// Required for store managers and staff
    pub store_id: Option<Uuid>,
}

/// Account update request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAccount {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub status: Option<EntityStatus>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// Account view returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub status: EntityStatus,
    pub brand_id: Option<Uuid>,
    pub store_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            name: account.name,
            role: account.role,
            status: account.status,
            brand_id: account.brand_id,
            store_id: account.store_id,
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, brand: Option<Uuid>, store: Option<Uuid>) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role,
            brand_id: brand,
            store_id: store,
        }
    }

    #[test]
    fn creation_hierarchy() {
        assert!(Role::SystemAdmin.can_create(Role::BrandAdmin));
        assert!(!Role::SystemAdmin.can_create(Role::Staff));
        assert!(Role::BrandAdmin.can_create(Role::StoreManager));
        assert!(!Role::BrandAdmin.can_create(Role::BrandAdmin));
        assert!(Role::StoreManager.can_create(Role::Staff));
        assert!(!Role::Staff.can_create(Role::Staff));
        assert!(!Role::User.can_create(Role::Staff));
    }

    #[test]
    fn brand_scope() {
        let brand = Uuid::new_v4();
        assert!(actor(Role::SystemAdmin, None, None).ensure_brand(brand).is_ok());
        assert!(actor(Role::BrandAdmin, Some(brand), None).ensure_brand(brand).is_ok());
        assert!(matches!(
            actor(Role::BrandAdmin, Some(Uuid::new_v4()), None).ensure_brand(brand),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn store_scope_applies_only_to_store_roles() {
        let brand = Uuid::new_v4();
        let store = Uuid::new_v4();
        let other_store = Uuid::new_v4();

        let manager = actor(Role::BrandManager, Some(brand), None);
        assert!(manager.ensure_store(brand, other_store).is_ok());

        let staff = actor(Role::Staff, Some(brand), Some(store));
        assert!(staff.ensure_store(brand, store).is_ok());
        assert!(staff.ensure_store(brand, other_store).is_err());
    }

    #[test]
    fn response_hides_password_hash() {
        let account = Account::new(
            "cashier".into(),
            "secret-hash".into(),
            "Cashier".into(),
            Role::Staff,
            Some(Uuid::new_v4()),
            Some(Uuid::new_v4()),
        );
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("secret-hash"));
        assert_eq!(AccountResponse::from(account).role, Role::Staff);
    }
}
