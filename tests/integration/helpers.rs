//! Shared test helpers for integration tests.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use pmo_core::traits::Repository;
use pmo_core::types::ActorId;
use pmo_database::repositories::{ActivityRepository, ProjectRepository, TaskRepository};
use pmo_database::{InMemoryStore, Store, UnitOfWork};
use pmo_entity::project::Project;

/// Test application context backed by a fresh in-memory store.
pub struct TestApp {
    /// Shared store.
    pub store: Arc<dyn Store>,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
        }
    }

    /// Begin a unit of work acting as `actor`.
    pub fn uow(&self, actor: i64) -> Arc<UnitOfWork> {
        UnitOfWork::begin(Arc::clone(&self.store), ActorId(actor))
    }

    /// Project repository on a fresh unit of work.
    pub fn projects(&self, actor: i64) -> ProjectRepository {
        ProjectRepository::new(self.uow(actor))
    }

    /// Task repository on a fresh unit of work.
    pub fn tasks(&self, actor: i64) -> TaskRepository {
        TaskRepository::new(self.uow(actor))
    }

    /// Activity repository on a fresh unit of work.
    pub fn activities(&self, actor: i64) -> ActivityRepository {
        ActivityRepository::new(self.uow(actor))
    }

    /// Insert one project per title, in the given order.
    pub async fn seed_projects(&self, titles: &[&str]) {
        let repo = self.projects(1);
        for (i, title) in titles.iter().enumerate() {
            repo.add(Project::new(format!("P-{i:02}"), *title)).await;
        }
        repo.commit(&token()).await.expect("seed projects");
    }
}

/// A token that is never cancelled.
pub fn token() -> CancellationToken {
    CancellationToken::new()
}
