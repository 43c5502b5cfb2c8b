//! Jobs command - loyalty points synchronisation.
//!
//! ```bash
//! # Report paid member orders every LOYALTY_SYNC_INTERVAL_HOURS
//! cargo run -- jobs work
//!
//! # One pass, e.g. from cron
//! cargo run -- jobs run-once
//!
//! # Orders still waiting to be reported
//! cargo run -- jobs status
//! ```

use std::sync::Arc;

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{client_from_config, Cache, Database, Persistence};
use crate::jobs::LoyaltySync;

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let uow = Arc::new(Persistence::new(db.get_connection()));
    let sync = LoyaltySync::new(uow, client_from_config(&config)?, &config);

    match args.action {
        JobsAction::Work => {
            let cache = Cache::connect(&config).await?;
            tracing::info!("Loyalty sync worker started. Press Ctrl+C to stop.");
            sync.with_lock(cache).run_forever().await?;
            tracing::info!("Loyalty sync worker stopped.");
        }
        JobsAction::RunOnce => {
            let report = sync.run_once().await?;
            println!("\n=== Loyalty Sync ===");
            println!("Processed: {}", report.processed);
            println!("Synced:    {}", report.synced);
            println!("Failed:    {}", report.failed);
            println!("Skipped:   {}", report.skipped);
            println!("====================\n");
        }
        JobsAction::Status => {
            let pending = sync.pending().await?;
            println!("Unsynced paid member orders: {}", pending);
        }
    }

    Ok(())
}
