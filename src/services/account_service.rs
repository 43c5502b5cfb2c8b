//! Staff account management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Account, AccountResponse, Actor, CreateAccount, Password, Role, UpdateAccount,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn create_account(&self, actor: &Actor, input: CreateAccount) -> AppResult<AccountResponse>;

    async fn get_account(&self, actor: &Actor, id: Uuid) -> AppResult<AccountResponse>;

    async fn update_account(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateAccount,
    ) -> AppResult<AccountResponse>;

    async fn list_brand_accounts(
        &self,
        actor: &Actor,
        brand_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<AccountResponse>>;

    async fn list_store_accounts(
        &self,
        actor: &Actor,
        store_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<AccountResponse>>;
}

pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Where a new account lives: `(brand, store)` after checking the
    /// creator may place it there.
    async fn placement(
        &self,
        actor: &Actor,
        input: &CreateAccount,
    ) -> AppResult<(Option<Uuid>, Option<Uuid>)> {
        if !actor.role.can_create(input.role) {
            return Err(AppError::Forbidden);
        }

        let brand_id = if actor.is_system_admin() {
            input
                .brand_id
                .ok_or_else(|| AppError::validation("brand_id is required"))?
        } else {
            actor.brand_id()?
        };
        let brand = self.uow.brands().find_by_id(brand_id).await?.ok_or_not_found()?;
        if !brand.is_active() {
            return Err(AppError::rule("Brand is deactivated"));
        }

        if !input.role.is_store_scoped() {
            return Ok((Some(brand_id), None));
        }

        let store_id = match actor.role {
            Role::StoreManager => actor.store_id.ok_or(AppError::Forbidden)?,
            _ => input
                .store_id
                .ok_or_else(|| AppError::validation("store_id is required for store roles"))?,
        };
        let store = self.uow.stores().find_by_id(store_id).await?.ok_or_not_found()?;
        if store.brand_id != brand_id {
            return Err(AppError::validation("Store belongs to another brand"));
        }
        Ok((Some(brand_id), Some(store_id)))
    }

    async fn load_visible(&self, actor: &Actor, id: Uuid) -> AppResult<Account> {
        let account = self.uow.accounts().find_by_id(id).await?.ok_or_not_found()?;
        if actor.id == account.id {
            return Ok(account);
        }
        match (account.brand_id, account.store_id) {
            (Some(brand_id), Some(store_id)) => actor.ensure_store(brand_id, store_id)?,
            (Some(brand_id), None) => actor.ensure_brand(brand_id)?,
            (None, _) => return Err(AppError::Forbidden),
        }
        Ok(account)
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn create_account(&self, actor: &Actor, input: CreateAccount) -> AppResult<AccountResponse> {
        let (brand_id, store_id) = self.placement(actor, &input).await?;

        let username = input.username.trim().to_lowercase();
        if self.uow.accounts().find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict("Account"));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let account = Account::new(
            username,
            password_hash,
            input.name.trim().to_string(),
            input.role,
            brand_id,
            store_id,
        );
        let account = self.uow.accounts().create(account).await?;

        tracing::info!(account_id = %account.id, role = %account.role, created_by = %actor.id, "Account created");
        Ok(account.into())
    }

    async fn get_account(&self, actor: &Actor, id: Uuid) -> AppResult<AccountResponse> {
        Ok(self.load_visible(actor, id).await?.into())
    }

    async fn update_account(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateAccount,
    ) -> AppResult<AccountResponse> {
        let mut account = self.load_visible(actor, id).await?;
        let is_self = actor.id == account.id;
        if !is_self && !actor.role.can_create(account.role) {
            return Err(AppError::Forbidden);
        }
        if is_self && input.status.is_some() {
            return Err(AppError::rule("Accounts cannot change their own status"));
        }

        if let Some(name) = input.name {
            account.name = name.trim().to_string();
        }
        if let Some(status) = input.status {
            account.status = status;
        }
        if let Some(password) = input.password {
            account.password_hash = Password::new(&password)?.into_string();
        }
        account.updated_at = chrono::Utc::now();

        Ok(self.uow.accounts().update(account).await?.into())
    }

    async fn list_brand_accounts(
        &self,
        actor: &Actor,
        brand_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<AccountResponse>> {
        if !actor.is_system_admin() {
            actor.require_any(Role::BRAND_MANAGERS)?;
        }
        actor.ensure_brand(brand_id)?;
        let page = self.uow.accounts().list_by_brand(brand_id, &params).await?;
        Ok(Paginated::from_page(page, &params).map(AccountResponse::from))
    }

    async fn list_store_accounts(
        &self,
        actor: &Actor,
        store_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<AccountResponse>> {
        actor.require_any(&[Role::BrandAdmin, Role::BrandManager, Role::StoreManager])?;
        let store = self.uow.stores().find_by_id(store_id).await?.ok_or_not_found()?;
        actor.ensure_store(store.brand_id, store.id)?;
        let page = self.uow.accounts().list_by_store(store_id, &params).await?;
        Ok(Paginated::from_page(page, &params).map(AccountResponse::from))
    }
}
