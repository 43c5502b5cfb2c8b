//! Cashier session repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use super::base::fetch_page;
use super::entities::session::{self, ActiveModel, Entity as SessionEntity};
use crate::domain::Session;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>>;

    /// The session with `start <= at < end`
    async fn find_current(&self, store_id: Uuid, at: DateTime<Utc>) -> AppResult<Option<Session>>;

    /// Sessions of the store intersecting `[start, end)`
    async fn list_overlapping(
        &self,
        store_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Session>>;

    /// Insert all sessions or none
    async fn create_many(&self, sessions: Vec<Session>) -> AppResult<Vec<Session>>;

    async fn update(&self, session: Session) -> AppResult<Session>;

    async fn list_by_store(
        &self,
        store_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Session>, u64)>;
}

pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for SessionStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        let row = SessionEntity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(Session::from))
    }

    async fn find_current(&self, store_id: Uuid, at: DateTime<Utc>) -> AppResult<Option<Session>> {
        let row = SessionEntity::find()
            .filter(session::Column::StoreId.eq(store_id))
            .filter(session::Column::StartDateTime.lte(at))
            .filter(session::Column::EndDateTime.gt(at))
            .order_by_desc(session::Column::StartDateTime)
            .one(&self.db)
            .await?;
        Ok(row.map(Session::from))
    }

    async fn list_overlapping(
        &self,
        store_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Session>> {
        let rows = SessionEntity::find()
            .filter(session::Column::StoreId.eq(store_id))
            .filter(session::Column::StartDateTime.lt(end))
            .filter(session::Column::EndDateTime.gt(start))
            .order_by_asc(session::Column::StartDateTime)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Session::from).collect())
    }

    async fn create_many(&self, sessions: Vec<Session>) -> AppResult<Vec<Session>> {
        let txn = self.db.begin().await?;
        let mut created = Vec::with_capacity(sessions.len());
        for session in &sessions {
            let model = ActiveModel::from(session).insert(&txn).await?;
            created.push(Session::from(model));
        }
        txn.commit().await?;
        Ok(created)
    }

    async fn update(&self, session: Session) -> AppResult<Session> {
        let model = ActiveModel::from(&session).update(&self.db).await?;
        Ok(Session::from(model))
    }

    async fn list_by_store(
        &self,
        store_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Session>, u64)> {
        let select = SessionEntity::find()
            .filter(session::Column::StoreId.eq(store_id))
            .order_by_desc(session::Column::StartDateTime);
        let (rows, total) = fetch_page(&self.db, select, params).await?;
        Ok((rows.into_iter().map(Session::from).collect(), total))
    }
}
