//! Core type definitions used across the PMO workspace.

pub mod filter;
pub mod id;
pub mod pagination;
pub mod query;
pub mod sorting;

pub use filter::Predicate;
pub use id::{ActorId, EntityId};
pub use pagination::{PageRequest, Paged};
pub use query::ListQuery;
pub use sorting::{SortDirection, SortValue, SortableField};
