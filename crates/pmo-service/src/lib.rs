//! # pmo-service
//!
//! Business services for the PMO back office. Services are built with
//! constructor injection: the store and any collaborators are passed in as
//! `Arc` references.

pub mod context;
pub mod identity;
pub mod report;

pub use context::RequestContext;
pub use identity::{ClaimsIdentity, StaticIdentity};
pub use report::{ProjectSummaryReport, ReportService};
