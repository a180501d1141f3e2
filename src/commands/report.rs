//! Report generation commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use pmo_core::config::AppConfig;
use pmo_core::error::AppError;
use pmo_core::traits::ReportRequest;
use pmo_database::open_store;
use pmo_service::report::project_summary::PROJECT_PARAMETER;
use pmo_service::{ProjectSummaryReport, ReportService};

/// Arguments for report commands
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Report subcommand
    #[command(subcommand)]
    pub command: ReportCommand,
}

/// Report subcommands
#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// List available report kinds
    List,
    /// Generate a report
    Run {
        /// Report kind
        #[arg(short, long)]
        kind: String,
        /// Restrict the report to one project id
        #[arg(short, long)]
        project: Option<i64>,
        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// One row of `report list`.
#[derive(Debug, Serialize, Tabled)]
struct KindRow {
    kind: String,
}

/// Artifact summary printed in JSON mode.
#[derive(Debug, Serialize)]
struct ArtifactOutput {
    file_name: String,
    content_type: String,
    generated_at: String,
    content: String,
}

/// Execute report commands
pub async fn execute(
    args: &ReportArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = open_store(&config.database).await?;
    let service = ReportService::new();
    service
        .register(Arc::new(ProjectSummaryReport::new(store)))
        .await;

    match &args.command {
        ReportCommand::List => {
            let kinds: Vec<KindRow> = service
                .kinds()
                .await
                .into_iter()
                .map(|kind| KindRow { kind })
                .collect();
            output::print_list(&kinds, format);
        }
        ReportCommand::Run {
            kind,
            project,
            output: out_path,
        } => {
            let mut request = ReportRequest::new(kind.as_str());
            if let Some(id) = project {
                request = request.with_parameter(PROJECT_PARAMETER, id.to_string());
            }
            let artifact = service.generate(&request).await?;

            if let Some(path) = out_path {
                tokio::fs::write(path, &artifact.content).await?;
                output::print_success(&format!("Report written to '{path}'"));
                return Ok(());
            }

            let content = String::from_utf8_lossy(&artifact.content).into_owned();
            match format {
                OutputFormat::Table => print!("{content}"),
                OutputFormat::Json => output::print_item(
                    &ArtifactOutput {
                        file_name: artifact.file_name,
                        content_type: artifact.content_type,
                        generated_at: artifact.generated_at.to_rfc3339(),
                        content,
                    },
                    format,
                ),
            }
        }
    }

    Ok(())
}
