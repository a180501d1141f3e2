//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use pmo_core::config::AppConfig;
use pmo_core::error::AppError;
use pmo_database::connection::{self, mask_password};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Validate configuration file
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.database.url = mask_password(&shown.database.url);
            output::print_item(&shown, format);
        }
        ConfigCommand::Validate => {
            validate(config)?;
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Backend", &format!("{:?}", config.database.backend));
            output::print_kv("Database", &mask_password(&config.database.url));
            output::print_kv("Log level", &config.logging.level);
            output::print_kv(
                "Page size",
                &format!(
                    "{} (max {})",
                    config.pagination.default_page_size, config.pagination.max_page_size
                ),
            );
        }
    }

    Ok(())
}

/// Check cross-field constraints the schema cannot express.
fn validate(config: &AppConfig) -> Result<(), AppError> {
    connection::check_config(&config.database)?;
    let pagination = &config.pagination;
    if pagination.default_page_size == 0 || pagination.max_page_size == 0 {
        return Err(AppError::configuration("page sizes must be at least 1"));
    }
    if pagination.default_page_size > pagination.max_page_size {
        return Err(AppError::configuration(
            "pagination.default_page_size exceeds pagination.max_page_size",
        ));
    }
    Ok(())
}
