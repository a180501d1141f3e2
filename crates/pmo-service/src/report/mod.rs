//! Report generation.

pub mod project_summary;
pub mod service;

pub use project_summary::ProjectSummaryReport;
pub use service::ReportService;
