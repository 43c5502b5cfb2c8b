//! Read side of the wallet and point ledger.
//!
//! Ledger rows are only ever written by the workflows that move money or
//! points (top-up, wallet payment and refund, loyalty sync).

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Actor, Role, Transaction, TransactionFilter};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TransactionService: Send + Sync {
    async fn get_transaction(&self, actor: &Actor, id: Uuid) -> AppResult<Transaction>;

    async fn list_brand_transactions(
        &self,
        actor: &Actor,
        brand_id: Uuid,
        filter: TransactionFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Transaction>>;

    async fn list_user_transactions(
        &self,
        actor: &Actor,
        user_id: Uuid,
        filter: TransactionFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Transaction>>;
}

pub struct TransactionManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TransactionManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Members see their own rows, brand staff see the rows of their brand.
fn ensure_ledger_access(actor: &Actor, brand_id: Uuid, user_id: Option<Uuid>) -> AppResult<()> {
    if actor.role == Role::User {
        return match user_id {
            Some(user_id) if user_id == actor.id => Ok(()),
            _ => Err(AppError::Forbidden),
        };
    }
    actor.ensure_brand(brand_id)
}

#[async_trait]
impl<U: UnitOfWork> TransactionService for TransactionManager<U> {
    async fn get_transaction(&self, actor: &Actor, id: Uuid) -> AppResult<Transaction> {
        let entry = self.uow.transactions().find_by_id(id).await?.ok_or_not_found()?;
        ensure_ledger_access(actor, entry.brand_id, entry.user_id)?;
        Ok(entry)
    }

    async fn list_brand_transactions(
        &self,
        actor: &Actor,
        brand_id: Uuid,
        filter: TransactionFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Transaction>> {
        if !actor.is_system_admin() {
            actor.require_any(Role::BRAND_MANAGERS)?;
        }
        actor.ensure_brand(brand_id)?;
        let page = self
            .uow
            .transactions()
            .list_by_brand(brand_id, filter, &params)
            .await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn list_user_transactions(
        &self,
        actor: &Actor,
        user_id: Uuid,
        filter: TransactionFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Transaction>> {
        if actor.role == Role::User {
            if actor.id != user_id {
                return Err(AppError::Forbidden);
            }
        } else {
            let user = self.uow.users().find_by_id(user_id).await?.ok_or_not_found()?;
            actor.ensure_brand(user.brand_id)?;
        }
        let page = self
            .uow
            .transactions()
            .list_by_user(user_id, filter, &params)
            .await?;
        Ok(Paginated::from_page(page, &params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockTransactionRepository;
    use crate::services::testing::TestUnitOfWork;

    fn member(brand_id: Uuid) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::User,
            brand_id: Some(brand_id),
            store_id: None,
        }
    }

    #[test]
    fn members_only_see_their_own_rows() {
        let brand_id = Uuid::new_v4();
        let actor = member(brand_id);
        assert!(ensure_ledger_access(&actor, brand_id, Some(actor.id)).is_ok());
        assert!(ensure_ledger_access(&actor, brand_id, Some(Uuid::new_v4())).is_err());
        assert!(ensure_ledger_access(&actor, brand_id, None).is_err());
    }

    #[tokio::test]
    async fn member_lists_own_transactions_without_lookup() {
        let brand_id = Uuid::new_v4();
        let actor = member(brand_id);
        let own = Transaction::top_up(brand_id, actor.id, 100_000.0, None);

        let mut transactions = MockTransactionRepository::new();
        let user_id = actor.id;
        transactions
            .expect_list_by_user()
            .withf(move |id, _, _| *id == user_id)
            .returning(move |_, _, _| Ok((vec![own.clone()], 1)));

        let service = TransactionManager::new(Arc::new(
            TestUnitOfWork::default().with_transactions(transactions),
        ));
        let page = service
            .list_user_transactions(
                &actor,
                actor.id,
                TransactionFilter::default(),
                PaginationParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.meta.total, 1);
    }

    #[tokio::test]
    async fn staff_cannot_list_brand_ledger() {
        let brand_id = Uuid::new_v4();
        let staff = Actor {
            id: Uuid::new_v4(),
            role: Role::Staff,
            brand_id: Some(brand_id),
            store_id: Some(Uuid::new_v4()),
        };
        let service = TransactionManager::new(Arc::new(TestUnitOfWork::default()));
        let result = service
            .list_brand_transactions(
                &staff,
                brand_id,
                TransactionFilter::default(),
                PaginationParams::default(),
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
