//! Core traits defined in `pmo-core` and implemented by other crates.

pub mod identity;
pub mod report;
pub mod repository;
pub mod service;

pub use identity::{IdentityProvider, resolve_actor};
pub use report::{ReportArtifact, ReportHandler, ReportRequest};
pub use repository::Repository;
pub use service::Service;
