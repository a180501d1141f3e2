//! Report registry and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use pmo_core::error::AppError;
use pmo_core::result::AppResult;
use pmo_core::traits::{ReportArtifact, ReportHandler, ReportRequest, Service};

/// Dispatches report requests to the handler registered for their kind.
#[derive(Debug, Default)]
pub struct ReportService {
    /// Report kind → handler.
    handlers: RwLock<HashMap<String, Arc<dyn ReportHandler>>>,
}

impl Service for ReportService {}

impl ReportService {
    /// Creates a service with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its kind, replacing any previous handler
    /// for that kind.
    pub async fn register(&self, handler: Arc<dyn ReportHandler>) {
        let kind = handler.kind().to_string();
        let mut handlers = self.handlers.write().await;
        if handlers.insert(kind.clone(), handler).is_some() {
            warn!(kind = %kind, "Report handler replaced");
        } else {
            info!(kind = %kind, "Report handler registered");
        }
    }

    /// Registered report kinds, sorted.
    pub async fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.handlers.read().await.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Renders the requested report.
    pub async fn generate(&self, request: &ReportRequest) -> AppResult<ReportArtifact> {
        let handler = self
            .handlers
            .read()
            .await
            .get(&request.kind)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Unknown report kind '{}'", request.kind)))?;

        let artifact = handler.handle(request).await?;
        info!(
            kind = %request.kind,
            file_name = %artifact.file_name,
            bytes = artifact.content.len(),
            "Report generated"
        );
        Ok(artifact)
    }
}
