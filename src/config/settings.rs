//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_BUSINESS_UTC_OFFSET_HOURS, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_LOYALTY_SYNC_BATCH_SIZE, DEFAULT_LOYALTY_SYNC_INTERVAL_HOURS,
    DEFAULT_MENU_CACHE_TTL_SECONDS, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_VAT_RATE, MIN_JWT_SECRET_LENGTH,
};
use crate::domain::BusinessClock;

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// VAT rate included in selling prices (0.08 = 8%)
    pub vat_rate: f64,
    /// Offset of the stores' wall clock from UTC, in hours
    pub business_utc_offset_hours: i32,
    /// Base URL of the external loyalty service (sync disabled when unset)
    pub loyalty_api_url: Option<String>,
    loyalty_api_key: Option<String>,
    pub loyalty_sync_interval_hours: u64,
    pub loyalty_sync_batch_size: u64,
    pub menu_cache_ttl_seconds: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("vat_rate", &self.vat_rate)
            .field("business_utc_offset_hours", &self.business_utc_offset_hours)
            .field("loyalty_api_url", &self.loyalty_api_url)
            .field("loyalty_api_key", &"[REDACTED]")
            .field("loyalty_sync_interval_hours", &self.loyalty_sync_interval_hours)
            .field("loyalty_sync_batch_size", &self.loyalty_sync_batch_size)
            .field("menu_cache_ttl_seconds", &self.menu_cache_ttl_seconds)
            .finish()
    }
}

/// Parse an environment variable, falling back to a default when unset or malformed.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement),
    /// or if VAT_RATE / BUSINESS_UTC_OFFSET_HOURS are out of range.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let vat_rate = env_or("VAT_RATE", DEFAULT_VAT_RATE);
        if !(0.0..1.0).contains(&vat_rate) {
            panic!("VAT_RATE must be within [0, 1), got {}", vat_rate);
        }

        let business_utc_offset_hours =
            env_or("BUSINESS_UTC_OFFSET_HOURS", DEFAULT_BUSINESS_UTC_OFFSET_HOURS);
        if BusinessClock::new(business_utc_offset_hours).is_err() {
            panic!(
                "BUSINESS_UTC_OFFSET_HOURS must be within [-23, 23], got {}",
                business_utc_offset_hours
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env_or("JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env_or("SERVER_PORT", DEFAULT_SERVER_PORT),
            vat_rate,
            business_utc_offset_hours,
            loyalty_api_url: env::var("LOYALTY_API_URL").ok().filter(|v| !v.is_empty()),
            loyalty_api_key: env::var("LOYALTY_API_KEY").ok().filter(|v| !v.is_empty()),
            loyalty_sync_interval_hours: env_or(
                "LOYALTY_SYNC_INTERVAL_HOURS",
                DEFAULT_LOYALTY_SYNC_INTERVAL_HOURS,
            )
            .max(1),
            loyalty_sync_batch_size: env_or(
                "LOYALTY_SYNC_BATCH_SIZE",
                DEFAULT_LOYALTY_SYNC_BATCH_SIZE,
            )
            .max(1),
            menu_cache_ttl_seconds: env_or(
                "MENU_CACHE_TTL_SECONDS",
                DEFAULT_MENU_CACHE_TTL_SECONDS,
            ),
        }
    }

    /// Configuration with development defaults, used by tests.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_tests() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            vat_rate: DEFAULT_VAT_RATE,
            business_utc_offset_hours: DEFAULT_BUSINESS_UTC_OFFSET_HOURS,
            loyalty_api_url: None,
            loyalty_api_key: None,
            loyalty_sync_interval_hours: DEFAULT_LOYALTY_SYNC_INTERVAL_HOURS,
            loyalty_sync_batch_size: DEFAULT_LOYALTY_SYNC_BATCH_SIZE,
            menu_cache_ttl_seconds: DEFAULT_MENU_CACHE_TTL_SECONDS,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// API key sent to the loyalty service, if configured.
    pub fn loyalty_api_key(&self) -> Option<&str> {
        self.loyalty_api_key.as_deref()
    }

    /// Wall clock of the stores.
    pub fn business_clock(&self) -> BusinessClock {
        // Range is checked in from_env
        BusinessClock::new(self.business_utc_offset_hours).unwrap_or_default()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
