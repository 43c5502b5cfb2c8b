//! Infrastructure layer - External systems integration
//!
//! - PostgreSQL connection, migrations and repositories (SeaORM)
//! - Unit of Work for multi-aggregate transactions
//! - Redis cache, rate limit counters and distributed locks
//! - Client of the external loyalty service

pub mod cache;
pub mod db;
pub mod loyalty;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, LockGuard};
pub use db::{Database, Migrator};
pub use loyalty::{
    client_from_config, DisabledLoyaltyClient, EarnPointsRequest, EarnPointsResponse,
    HttpLoyaltyClient, LoyaltyClient,
};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use loyalty::MockLoyaltyClient;
