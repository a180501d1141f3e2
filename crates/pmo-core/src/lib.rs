//! # pmo-core
//!
//! Core crate for the PMO back office. Contains seam traits, configuration
//! schemas, typed identifiers, pagination/sorting types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other PMO crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
