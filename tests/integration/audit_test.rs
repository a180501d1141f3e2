//! Audit provenance stamped at commit time.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use pmo_core::traits::Repository;
use pmo_database::repositories::{ClientRepository, ProjectRepository, TaskRepository};
use pmo_entity::client::Client;
use pmo_entity::project::Project;
use pmo_entity::task::ProjectTask;

use crate::helpers::{TestApp, token};

#[tokio::test]
async fn test_insert_stamps_creation_only() {
    let app = TestApp::new();
    let repo = app.projects(7);

    let mut project = Project::new("ACME-1", "Rollout");
    project.audit.updated_at = Some(Utc::now());
    project.audit.updated_by_id = Some(99);
    repo.add(project).await;

    let before = Utc::now();
    repo.commit(&token()).await.expect("commit");
    let after = Utc::now();

    let stored = repo.get_by_id(1).await.expect("stored");
    assert!(stored.audit.created_at >= before && stored.audit.created_at <= after);
    assert_eq!(stored.audit.created_by_id, 7);
    assert_eq!(stored.audit.updated_at, None);
    assert_eq!(stored.audit.updated_by_id, None);
}

#[tokio::test]
async fn test_update_keeps_creation_and_stamps_modification() {
    let app = TestApp::new();
    app.seed_projects(&["Rollout"]).await;
    let original = app.projects(1).get_by_id(1).await.expect("seeded");

    let repo = app.projects(8);
    let mut edited = original.clone();
    edited.title = "Rollout v2".to_string();
    repo.update(edited).await;
    repo.commit(&token()).await.expect("commit");

    let stored = repo.get_by_id(1).await.expect("stored");
    assert_eq!(stored.title, "Rollout v2");
    assert_eq!(stored.audit.created_at, original.audit.created_at);
    assert_eq!(stored.audit.created_by_id, original.audit.created_by_id);
    assert_eq!(stored.audit.updated_by_id, Some(8));
    assert!(stored.audit.updated_at.is_some_and(|t| t >= original.audit.created_at));
}

#[tokio::test]
async fn test_tampered_creation_fields_are_not_written() {
    let app = TestApp::new();
    app.seed_projects(&["Rollout"]).await;
    let original = app.projects(1).get_by_id(1).await.expect("seeded");

    let repo = app.projects(2);
    let mut tampered = original.clone();
    tampered.audit.created_at = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
    tampered.audit.created_by_id = 999;
    repo.update(tampered).await;
    repo.commit(&token()).await.expect("commit");

    let stored = repo.get_by_id(1).await.expect("stored");
    assert_eq!(stored.audit.created_at, original.audit.created_at);
    assert_eq!(stored.audit.created_by_id, 1);
}

#[tokio::test]
async fn test_mixed_batch_shares_timestamp_and_actor() {
    let app = TestApp::new();
    app.seed_projects(&["Existing"]).await;
    let seed = app.uow(1);
    let tasks = TaskRepository::new(Arc::clone(&seed));
    let clients = ClientRepository::new(Arc::clone(&seed));
    tasks.add(ProjectTask::new(1, "Install")).await;
    clients.add(Client::new("Acme")).await;
    seed.commit(&token()).await.expect("seed");

    let uow = app.uow(42);
    let projects = ProjectRepository::new(Arc::clone(&uow));
    let tasks = TaskRepository::new(Arc::clone(&uow));
    let clients = ClientRepository::new(Arc::clone(&uow));

    projects.add(Project::new("NEW-1", "Fresh")).await;
    let mut task = tasks.get_by_id(1).await.expect("task");
    task.title = "Install v2".to_string();
    tasks.update(task).await;
    clients.remove_by_id(1).await.expect("stage delete");

    let affected = projects.commit(&token()).await.expect("commit");
    assert_eq!(affected, 3);

    let inserted = projects.get_by_id(2).await.expect("inserted");
    let updated = tasks.get_by_id(1).await.expect("updated");
    let deleted = clients.get_by_id_with_deleted(1).await.expect("deleted");

    let now = inserted.audit.created_at;
    assert_eq!(updated.audit.updated_at, Some(now));
    assert_eq!(deleted.deletion.deleted_at, Some(now));
    assert_eq!(inserted.audit.created_by_id, 42);
    assert_eq!(updated.audit.updated_by_id, Some(42));
    assert_eq!(deleted.deletion.deleted_by_id, Some(42));
}
