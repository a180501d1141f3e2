//! Pluggable report generation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A request for one report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Report kind, matched against [`ReportHandler::kind`].
    pub kind: String,
    /// Free-form parameters understood by the handler.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl ReportRequest {
    /// Create a request for the given kind with no parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add a parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

/// A rendered report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type of `content`.
    pub content_type: String,
    /// Rendered bytes.
    pub content: Vec<u8>,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
}

/// Produces one kind of report.
#[async_trait]
pub trait ReportHandler: Send + Sync + std::fmt::Debug {
    /// The report kind this handler serves.
    fn kind(&self) -> &'static str;

    /// Render the report.
    async fn handle(&self, request: &ReportRequest) -> AppResult<ReportArtifact>;
}
