//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod report;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use pmo_core::config::AppConfig;
use pmo_core::error::AppError;

/// PMO back office administration
#[derive(Debug, Parser)]
#[command(name = "pmo", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Report generation
    Report(report::ReportArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, app_config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &app_config).await,
            Commands::Config(args) => {
                config::execute(args, &app_config, &self.config, self.format)
            }
            Commands::Report(args) => report::execute(args, &app_config, self.format).await,
        }
    }
}
