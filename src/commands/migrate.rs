//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use pmo_core::config::AppConfig;
use pmo_core::error::AppError;
use pmo_database::connection;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            let pool = connection::connect(&config.database).await?;
            if connection::schema_ready(&pool).await? {
                println!("Schema present, applying pending migrations...");
            } else {
                println!("Creating schema...");
            }
            let result = pmo_database::migration::run_migrations(&pool).await;
            pool.close().await;
            result?;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
