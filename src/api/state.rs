//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{ServiceContainer, Services};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Redis cache, used for rate limiting. Absent in tests.
    pub cache: Option<Cache>,
    /// Database handle, used by the health check. Absent in tests.
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Wire the real services over the database and cache.
    pub fn from_config(database: Arc<Database>, cache: Cache, config: Config) -> Self {
        let services = Services::from_parts(database.get_connection(), Some(cache.clone()), config);

        Self {
            services: Arc::new(services),
            cache: Some(cache),
            database: Some(database),
        }
    }

    /// State over injected services and no infrastructure.
    pub fn with_services(services: Arc<dyn ServiceContainer>) -> Self {
        Self {
            services,
            cache: None,
            database: None,
        }
    }
}
