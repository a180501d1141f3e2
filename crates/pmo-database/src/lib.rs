//! # pmo-database
//!
//! Persistence for the PMO back office: storage backends (in-memory and
//! PostgreSQL), the unit of work with its audit/soft-delete save pipeline,
//! the dynamic ordering resolver, and the generic entity repository.

pub mod connection;
pub mod interceptor;
pub mod migration;
pub mod ordering;
pub mod repositories;
pub mod store;
pub mod unit_of_work;

pub use interceptor::{AuditContext, AuditInterceptor};
pub use ordering::{ResolvedOrder, order_by};
pub use repositories::EntityRepository;
pub use store::{InMemoryStore, PgStore, Store, open_store};
pub use unit_of_work::{PendingChange, PendingOp, UnitOfWork};
