//! Stores and their cashier sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::brand::normalize_code;
use crate::domain::session::validate_windows;
use crate::domain::{
    Actor, CreateSessions, CreateStore, Role, Session, Store, UpdateSession, UpdateStore,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Roles allowed to open and move sessions
const SESSION_MANAGERS: &[Role] = &[Role::BrandAdmin, Role::BrandManager, Role::StoreManager];

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StoreService: Send + Sync {
    async fn create_store(&self, actor: &Actor, input: CreateStore) -> AppResult<Store>;

    async fn get_store(&self, actor: &Actor, id: Uuid) -> AppResult<Store>;

    async fn list_stores(
        &self,
        actor: &Actor,
        brand_id: Uuid,
        name: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Store>>;

    async fn update_store(&self, actor: &Actor, id: Uuid, input: UpdateStore) -> AppResult<Store>;

    async fn create_sessions(
        &self,
        actor: &Actor,
        store_id: Uuid,
        input: CreateSessions,
    ) -> AppResult<Vec<Session>>;

    /// The session open at `now`, if any.
    async fn get_current_session(
        &self,
        actor: &Actor,
        store_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Session>;

    async fn list_sessions(
        &self,
        actor: &Actor,
        store_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<Session>>;

    async fn update_session(
        &self,
        actor: &Actor,
        session_id: Uuid,
        input: UpdateSession,
        now: DateTime<Utc>,
    ) -> AppResult<Session>;
}

pub struct StoreManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> StoreManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Load a store the actor is allowed to see.
    async fn visible_store(&self, actor: &Actor, id: Uuid) -> AppResult<Store> {
        let store = self.uow.stores().find_by_id(id).await?.ok_or_not_found()?;
        actor.ensure_store(store.brand_id, store.id)?;
        Ok(store)
    }
}

#[async_trait]
impl<U: UnitOfWork> StoreService for StoreManager<U> {
    async fn create_store(&self, actor: &Actor, input: CreateStore) -> AppResult<Store> {
        actor.require_any(&[Role::BrandAdmin])?;
        let brand_id = actor.brand_id()?;

        let code = normalize_code(&input.code);
        if self.uow.stores().find_by_code(brand_id, &code).await?.is_some() {
            return Err(AppError::conflict("Store code"));
        }

        let store = self.uow.stores().create(Store::new(brand_id, input)).await?;
        tracing::info!(store_id = %store.id, brand_id = %brand_id, code = %store.code, "Store created");
        Ok(store)
    }

    async fn get_store(&self, actor: &Actor, id: Uuid) -> AppResult<Store> {
        self.visible_store(actor, id).await
    }

    async fn list_stores(
        &self,
        actor: &Actor,
        brand_id: Uuid,
        name: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Store>> {
        actor.ensure_brand(brand_id)?;
        let page = self.uow.stores().list_by_brand(brand_id, name, &params).await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn update_store(&self, actor: &Actor, id: Uuid, input: UpdateStore) -> AppResult<Store> {
        actor.require_any(Role::BRAND_MANAGERS)?;
        let mut store = self.visible_store(actor, id).await?;
        store.apply(input);
        self.uow.stores().update(store).await
    }

    async fn create_sessions(
        &self,
        actor: &Actor,
        store_id: Uuid,
        input: CreateSessions,
    ) -> AppResult<Vec<Session>> {
        actor.require_any(SESSION_MANAGERS)?;
        let store = self.visible_store(actor, store_id).await?;

        let (Some(start), Some(end)) = (
            input.sessions.iter().map(|w| w.start_date_time).min(),
            input.sessions.iter().map(|w| w.end_date_time).max(),
        ) else {
            return Err(AppError::validation("At least one session is required"));
        };
        let existing = self
            .uow
            .sessions()
            .list_overlapping(store.id, start, end)
            .await?;
        validate_windows(&input.sessions, &existing)?;

        let sessions = input
            .sessions
            .iter()
            .map(|window| Session::new(store.id, window, Some(actor.id)))
            .collect();
        let created = self.uow.sessions().create_many(sessions).await?;

        tracing::info!(store_id = %store.id, count = created.len(), "Sessions created");
        Ok(created)
    }

    async fn get_current_session(
        &self,
        actor: &Actor,
        store_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Session> {
        let store = self.visible_store(actor, store_id).await?;
        self.uow
            .sessions()
            .find_current(store.id, now)
            .await?
            .ok_or_not_found()
    }

    async fn list_sessions(
        &self,
        actor: &Actor,
        store_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<Session>> {
        let store = self.visible_store(actor, store_id).await?;
        let page = self.uow.sessions().list_by_store(store.id, &params).await?;
        Ok(Paginated::from_page(page, &params))
    }

    async fn update_session(
        &self,
        actor: &Actor,
        session_id: Uuid,
        input: UpdateSession,
        now: DateTime<Utc>,
    ) -> AppResult<Session> {
        actor.require_any(SESSION_MANAGERS)?;
        let mut session = self
            .uow
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or_not_found()?;
        self.visible_store(actor, session.store_id).await?;

        let start = input.start_date_time.unwrap_or(session.start_date_time);
        let end = input.end_date_time.unwrap_or(session.end_date_time);
        let neighbours = if start < end {
            self.uow
                .sessions()
                .list_overlapping(session.store_id, start, end)
                .await?
        } else {
            Vec::new()
        };

        session.reschedule(input, now, &neighbours)?;
        self.uow.sessions().update(session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionWindow;
    use crate::infra::repositories::{MockSessionRepository, MockStoreRepository};
    use crate::services::testing::TestUnitOfWork;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn window(start: u32, end: u32) -> SessionWindow {
        SessionWindow {
            name: None,
            start_date_time: at(start),
            end_date_time: at(end),
        }
    }

    fn store_input() -> CreateStore {
        CreateStore {
            name: "Nguyen Hue".to_string(),
            short_name: None,
            code: "pnh01".to_string(),
            email: None,
            phone: None,
            address: None,
            wifi_name: None,
            wifi_password: None,
        }
    }

    fn store(brand_id: Uuid) -> Store {
        Store::new(brand_id, store_input())
    }

    fn manager_of(store: &Store) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::StoreManager,
            brand_id: Some(store.brand_id),
            store_id: Some(store.id),
        }
    }

    fn stores_returning(store: Store) -> MockStoreRepository {
        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));
        stores
    }

    #[tokio::test]
    async fn create_sessions_rejects_overlap_with_existing() {
        let store = store(Uuid::new_v4());
        let actor = manager_of(&store);
        let existing = Session::new(store.id, &window(8, 12), None);

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_list_overlapping()
            .returning(move |_, _, _| Ok(vec![existing.clone()]));
        sessions.expect_create_many().never();

        let uow = TestUnitOfWork::default()
            .with_stores(stores_returning(store.clone()))
            .with_sessions(sessions);
        let service = StoreManager::new(Arc::new(uow));

        let input = CreateSessions {
            sessions: vec![window(11, 15)],
        };
        let result = service.create_sessions(&actor, store.id, input).await;
        assert!(matches!(result, Err(AppError::BusinessRule(_))));
    }

    #[tokio::test]
    async fn create_sessions_persists_all_windows() {
        let store = store(Uuid::new_v4());
        let actor = manager_of(&store);

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_list_overlapping()
            .withf(|_, start, end| *start == at(8) && *end == at(20))
            .returning(|_, _, _| Ok(vec![]));
        sessions
            .expect_create_many()
            .withf(|sessions| sessions.len() == 2)
            .returning(Ok);

        let uow = TestUnitOfWork::default()
            .with_stores(stores_returning(store.clone()))
            .with_sessions(sessions);
        let service = StoreManager::new(Arc::new(uow));

        let input = CreateSessions {
            sessions: vec![window(8, 14), window(14, 20)],
        };
        let created = service.create_sessions(&actor, store.id, input).await.unwrap();
        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|s| s.created_by == Some(actor.id)));
    }

    #[tokio::test]
    async fn staff_cannot_open_sessions() {
        let store = store(Uuid::new_v4());
        let staff = Actor {
            role: Role::Staff,
            ..manager_of(&store)
        };
        let service = StoreManager::new(Arc::new(TestUnitOfWork::default()));
        let input = CreateSessions {
            sessions: vec![window(8, 12)],
        };
        let result = service.create_sessions(&staff, store.id, input).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn manager_of_another_store_cannot_read_it() {
        let store = store(Uuid::new_v4());
        let other = Actor {
            store_id: Some(Uuid::new_v4()),
            ..manager_of(&store)
        };
        let uow = TestUnitOfWork::default().with_stores(stores_returning(store.clone()));
        let service = StoreManager::new(Arc::new(uow));

        let result = service.get_current_session(&other, store.id, at(9)).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn no_open_session_is_not_found() {
        let store = store(Uuid::new_v4());
        let actor = manager_of(&store);
        let mut sessions = MockSessionRepository::new();
        sessions.expect_find_current().returning(|_, _| Ok(None));
        let uow = TestUnitOfWork::default()
            .with_stores(stores_returning(store.clone()))
            .with_sessions(sessions);
        let service = StoreManager::new(Arc::new(uow));

        let result = service.get_current_session(&actor, store.id, at(9)).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn duplicate_store_code_conflicts() {
        let brand_id = Uuid::new_v4();
        let existing = store(brand_id);
        let mut stores = MockStoreRepository::new();
        stores
            .expect_find_by_code()
            .withf(|_, code| code == "PNH01")
            .returning(move |_, _| Ok(Some(existing.clone())));
        let service = StoreManager::new(Arc::new(TestUnitOfWork::default().with_stores(stores)));

        let admin = Actor {
            id: Uuid::new_v4(),
            role: Role::BrandAdmin,
            brand_id: Some(brand_id),
            store_id: None,
        };
        let result = service.create_store(&admin, store_input()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

}
