//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Connect without auto-running migrations for manual control
    let db = Database::connect_without_migrations(&config).await?;

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            db.run_migrations().await?;
            tracing::info!("Migrations completed");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back last migration...");
            db.rollback_migration().await?;
            tracing::info!("Rollback completed");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let state = if applied { "applied" } else { "pending" };
                println!("{}: {}", name, state);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping users and notes, then re-running all migrations");
            db.fresh_migrations().await?;
            tracing::info!("Fresh migrations completed");
        }
    }

    Ok(())
}
