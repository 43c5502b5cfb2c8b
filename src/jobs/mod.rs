//! Background jobs.

mod loyalty_sync;

pub use loyalty_sync::{LoyaltySync, SyncReport};
