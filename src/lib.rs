//! POS backend - multi-tenant point-of-sale service
//!
//! Brands own stores, staff accounts, members, a product catalog, menus
//! and promotions. Stores open cashier sessions and take orders against
//! the menu that is active at that moment; paid member orders are later
//! reported to an external loyalty service.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Business entities, pricing and order rules
//! - **services**: Use cases and tenancy checks
//! - **infra**: Database, Redis cache and the loyalty client
//! - **jobs**: Loyalty points synchronisation
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Pagination
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Report paid member orders to the loyalty service
//! cargo run -- jobs run-once
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Actor, Password, Role};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
