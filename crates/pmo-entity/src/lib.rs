//! # pmo-entity
//!
//! Domain entity models for the PMO back office. Every entity derives
//! `Debug`, `Clone`, `Serialize` and `Deserialize`, and declares its table,
//! sortable fields and audit/soft-delete capabilities with
//! [`impl_entity!`].

pub mod activity;
pub mod capability;
pub mod client;
pub mod machine;
pub mod project;
pub mod task;
pub mod user;

pub use capability::{AuditStamp, Auditable, Deletion, Entity, SoftDeletable};
