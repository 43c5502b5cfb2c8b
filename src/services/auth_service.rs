//! Authentication service - staff and member logins, token verification.
//!
//! Passwords are checked through the domain `Password` value object and
//! tokens are HS256 JWTs carrying the caller's role and tenancy scope.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::brand::normalize_code;
use crate::domain::member::normalize_phone;
use crate::domain::{Actor, Password, Role, UserLogin};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    /// Account username, or the member's phone number
    pub username: String,
    pub role: String,
    pub brand_id: Option<Uuid>,
    pub store_id: Option<Uuid>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// The caller described by the token.
    pub fn actor(&self) -> AppResult<Actor> {
        let role: Role = self.role.parse().map_err(|_| AppError::Unauthorized)?;
        Ok(Actor {
            id: self.sub,
            role,
            brand_id: self.brand_id,
            store_id: self.store_id,
        })
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub role: Role,
}

/// Staff login request
#[derive(Debug, Clone, Deserialize, validator::Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "brand.admin")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Staff login
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Member login with brand code and phone number
    async fn member_login(&self, input: UserLogin) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(actor: &Actor, username: &str, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: actor.id,
        username: username.to_string(),
        role: actor.role.to_string(),
        brand_id: actor.brand_id,
        store_id: actor.store_id,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        role: actor.role,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let account = self.uow.accounts().find_by_username(username.trim()).await?;

        // Verify against a dummy hash when the account is missing so both
        // paths take the same time
        let valid = Password::verify_or_dummy(
            account.as_ref().map(|a| a.password_hash.as_str()),
            &password,
        );
        let account = match account {
            Some(account) if valid => account,
            _ => return Err(AppError::InvalidCredentials),
        };

        if !account.is_active() {
            tracing::warn!(account_id = %account.id, "Login attempt on inactive account");
            return Err(AppError::Forbidden);
        }

        tracing::info!(account_id = %account.id, role = %account.role, "Staff login");
        generate_token(&account.actor(), &account.username, &self.config)
    }

    async fn member_login(&self, input: UserLogin) -> AppResult<TokenResponse> {
        let brand = self
            .uow
            .brands()
            .find_by_code(&normalize_code(&input.brand_code))
            .await?
            .filter(|brand| brand.is_active())
            .ok_or(AppError::InvalidCredentials)?;
        let phone = normalize_phone(&input.phone).map_err(|_| AppError::InvalidCredentials)?;

        let user = self.uow.users().find_by_phone(brand.id, &phone).await?;
        let valid = Password::verify_or_dummy(
            user.as_ref().map(|u| u.password_hash.as_str()),
            &input.password,
        );
        let user = match user {
            Some(user) if valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        if !user.is_active() {
            return Err(AppError::Forbidden);
        }

        generate_token(&user.actor(), &user.phone, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Account;
    use crate::infra::repositories::MockAccountRepository;
    use crate::services::testing::TestUnitOfWork;

    fn account(password: &str, role: Role) -> Account {
        Account::new(
            "brand.admin".to_string(),
            Password::new(password).unwrap().into_string(),
            "Admin".to_string(),
            role,
            Some(Uuid::new_v4()),
            None,
        )
    }

    #[tokio::test]
    async fn login_issues_token_with_scope() {
        let stored = account("SecurePass123!", Role::BrandAdmin);
        let brand_id = stored.brand_id;
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_username()
            .returning(move |_| Ok(Some(stored.clone())));
        let uow = TestUnitOfWork::default().with_accounts(accounts);

        let auth = Authenticator::new(Arc::new(uow), Config::for_tests());
        let token = auth
            .login("brand.admin".to_string(), "SecurePass123!".to_string())
            .await
            .unwrap();
        assert_eq!(token.role, Role::BrandAdmin);

        let claims = auth.verify_token(&token.access_token).unwrap();
        let actor = claims.actor().unwrap();
        assert_eq!(actor.role, Role::BrandAdmin);
        assert_eq!(actor.brand_id, brand_id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let stored = account("SecurePass123!", Role::Staff);
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_username()
            .returning(move |name| Ok((name == "brand.admin").then(|| stored.clone())));
        let uow = TestUnitOfWork::default().with_accounts(accounts);
        let auth = Authenticator::new(Arc::new(uow), Config::for_tests());

        let wrong = auth
            .login("brand.admin".to_string(), "nope-nope".to_string())
            .await;
        let unknown = auth
            .login("ghost".to_string(), "SecurePass123!".to_string())
            .await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn inactive_account_is_forbidden() {
        let mut stored = account("SecurePass123!", Role::Staff);
        stored.status = crate::domain::EntityStatus::Deactivate;
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_username()
            .returning(move |_| Ok(Some(stored.clone())));
        let uow = TestUnitOfWork::default().with_accounts(accounts);
        let auth = Authenticator::new(Arc::new(uow), Config::for_tests());

        let result = auth
            .login("brand.admin".to_string(), "SecurePass123!".to_string())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let auth = Authenticator::new(Arc::new(TestUnitOfWork::default()), Config::for_tests());
        assert!(auth.verify_token("not-a-token").is_err());
    }

    #[test]
    fn unknown_role_in_claims_is_unauthorized() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "x".to_string(),
            role: "ROOT".to_string(),
            brand_id: None,
            store_id: None,
            exp: 0,
            iat: 0,
        };
        assert!(matches!(claims.actor(), Err(AppError::Unauthorized)));
    }
}
