//! Member (brand customer) service.
//!
//! Members sign up against a brand code and log in through the auth
//! service. Staff may browse members of their brand and top up wallets.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::member::normalize_phone;
use crate::domain::wallet;
use crate::domain::{
    Actor, Password, Role, SignUpUser, TopUp, UpdateUser, User, UserFilter, UserResponse,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a member of the brand named by `input.brand_code`.
    async fn sign_up(&self, input: SignUpUser) -> AppResult<UserResponse>;

    async fn get_user(&self, actor: &Actor, id: Uuid) -> AppResult<UserResponse>;

    async fn update_user(&self, actor: &Actor, id: Uuid, input: UpdateUser)
        -> AppResult<UserResponse>;

    async fn list_brand_users(
        &self,
        actor: &Actor,
        brand_id: Uuid,
        filter: UserFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>>;

    /// Credit a member's wallet and the brand balance.
    async fn top_up(&self, actor: &Actor, id: Uuid, input: TopUp) -> AppResult<UserResponse>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Members reach only themselves; staff reach members of their brand.
    async fn load_visible(&self, actor: &Actor, id: Uuid) -> AppResult<User> {
        if actor.role == Role::User && actor.id != id {
            return Err(AppError::Forbidden);
        }
        let user = self.uow.users().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_brand(user.brand_id)?;
        Ok(user)
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn sign_up(&self, input: SignUpUser) -> AppResult<UserResponse> {
        let brand = self
            .uow
            .brands()
            .find_by_code(&input.brand_code())
            .await?
            .filter(|brand| brand.is_active())
            .ok_or_else(|| AppError::validation("Unknown brand code"))?;

        let phone = normalize_phone(&input.phone)?;
        if self.uow.users().find_by_phone(brand.id, &phone).await?.is_some() {
            return Err(AppError::conflict("Phone number"));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(User::new(brand.id, input, password_hash)?)
            .await?;

        tracing::info!(user_id = %user.id, brand_id = %brand.id, "Member signed up");
        Ok(user.into())
    }

    async fn get_user(&self, actor: &Actor, id: Uuid) -> AppResult<UserResponse> {
        Ok(self.load_visible(actor, id).await?.into())
    }

    async fn update_user(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateUser,
    ) -> AppResult<UserResponse> {
        let mut user = self.load_visible(actor, id).await?;
        let is_self = actor.role == Role::User;

        if input.password.is_some() && !is_self {
            return Err(AppError::Forbidden);
        }
        if input.status.is_some() {
            if is_self {
                return Err(AppError::rule("Members cannot change their own status"));
            }
            actor.require_any(Role::BRAND_MANAGERS)?;
        }

        user.apply(&input);
        if let Some(password) = &input.password {
            user.password_hash = Password::new(password)?.into_string();
        }
        Ok(self.uow.users().update(user).await?.into())
    }

    async fn list_brand_users(
        &self,
        actor: &Actor,
        brand_id: Uuid,
        filter: UserFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>> {
        if !actor.is_system_admin() {
            actor.require_any(Role::STORE_OPERATORS)?;
        }
        actor.ensure_brand(brand_id)?;
        let page = self
            .uow
            .users()
            .list_by_brand(brand_id, filter, &params)
            .await?;
        Ok(Paginated::from_page(page, &params).map(UserResponse::from))
    }

    async fn top_up(&self, actor: &Actor, id: Uuid, input: TopUp) -> AppResult<UserResponse> {
        actor.require_any(Role::STORE_OPERATORS)?;
        if !input.amount.is_finite() || input.amount <= 0.0 {
            return Err(AppError::validation("Top-up amount must be positive"));
        }
        let member = self.uow.users().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_brand(member.brand_id)?;
        if !member.is_active() {
            return Err(AppError::rule("Member is deactivated"));
        }

        let (user_id, brand_id) = (member.id, member.brand_id);
        let TopUp {
            amount,
            description,
        } = input;
        let user = with_transaction!(self.uow, |ctx| {
            let mut user = ctx
                .users()
                .find_for_update(user_id)
                .await?
                .ok_or_not_found()?;
            let mut brand = ctx
                .brands()
                .find_for_update(brand_id)
                .await?
                .ok_or_not_found()?;

            let entry = wallet::top_up(&mut user, &mut brand, amount, description)?;
            let user = ctx.users().update(&user).await?;
            ctx.brands().update(&brand).await?;
            ctx.transactions().record(&entry).await?;
            Ok(user)
        })?;

        tracing::info!(user_id = %user_id, amount, by = %actor.id, "Wallet topped up");
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Brand, CreateBrand, EntityStatus};
    use crate::infra::repositories::{MockBrandRepository, MockUserRepository};
    use crate::services::testing::TestUnitOfWork;

    fn brand() -> Brand {
        Brand::new(CreateBrand {
            name: "Passio".into(),
            brand_code: "PASSIO".into(),
            email: None,
            phone: None,
            address: None,
            pic_url: None,
        })
    }

    fn sign_up_input() -> SignUpUser {
        SignUpUser {
            brand_code: "passio".into(),
            phone: "0901 234 567".into(),
            password: "member-pass".into(),
            full_name: "Tran Thi B".into(),
            email: None,
            gender: None,
            date_of_birth: None,
            address: None,
        }
    }

    fn member(brand_id: Uuid) -> User {
        User::new(brand_id, sign_up_input(), "hash".into()).unwrap()
    }

    #[tokio::test]
    async fn sign_up_rejects_taken_phone() {
        let brand = brand();
        let brand_id = brand.id;
        let mut brands = MockBrandRepository::new();
        brands
            .expect_find_by_code()
            .withf(|code| code == "PASSIO")
            .returning(move |_| Ok(Some(brand.clone())));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_phone()
            .withf(move |id, phone| *id == brand_id && phone == "0901234567")
            .returning(move |brand_id, _| Ok(Some(member(brand_id))));
        users.expect_create().never();

        let service = UserManager::new(Arc::new(
            TestUnitOfWork::default().with_brands(brands).with_users(users),
        ));
        let result = service.sign_up(sign_up_input()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn sign_up_hashes_password() {
        let brand = brand();
        let mut brands = MockBrandRepository::new();
        brands
            .expect_find_by_code()
            .returning(move |_| Ok(Some(brand.clone())));
        let mut users = MockUserRepository::new();
        users.expect_find_by_phone().returning(|_, _| Ok(None));
        users
            .expect_create()
            .withf(|user| {
                user.password_hash != "member-pass"
                    && Password::from_hash(user.password_hash.clone()).verify("member-pass")
            })
            .returning(Ok);

        let service = UserManager::new(Arc::new(
            TestUnitOfWork::default().with_brands(brands).with_users(users),
        ));
        let created = service.sign_up(sign_up_input()).await.unwrap();
        assert_eq!(created.phone, "0901234567");
        assert_eq!(created.balance, 0.0);
    }

    #[tokio::test]
    async fn member_cannot_read_other_members() {
        let brand_id = Uuid::new_v4();
        let me = member(brand_id);
        let service = UserManager::new(Arc::new(TestUnitOfWork::default()));
        let result = service.get_user(&me.actor(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn members_cannot_change_their_status() {
        let me = member(Uuid::new_v4());
        let id = me.id;
        let actor = me.actor();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(me.clone())));
        users.expect_update().never();

        let service = UserManager::new(Arc::new(TestUnitOfWork::default().with_users(users)));
        let update = UpdateUser {
            status: Some(EntityStatus::Deactivate),
            ..Default::default()
        };
        let result = service.update_user(&actor, id, update).await;
        assert!(matches!(result, Err(AppError::BusinessRule(_))));
    }

    #[tokio::test]
    async fn top_up_requires_positive_amount() {
        let staff = Actor {
            id: Uuid::new_v4(),
            role: Role::Staff,
            brand_id: Some(Uuid::new_v4()),
            store_id: Some(Uuid::new_v4()),
        };
        let service = UserManager::new(Arc::new(TestUnitOfWork::default()));
        let result = service
            .top_up(
                &staff,
                Uuid::new_v4(),
                TopUp {
                    amount: 0.0,
                    description: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
