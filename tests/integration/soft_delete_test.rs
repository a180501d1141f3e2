//! Logical versus physical deletion.

use chrono::Utc;

use pmo_core::traits::Repository;
use pmo_core::types::{ListQuery, PageRequest};
use pmo_entity::activity::Activity;
use pmo_entity::task::ProjectTask;

use crate::helpers::{TestApp, token};

#[tokio::test]
async fn test_soft_deleted_record_stays_retrievable() {
    let app = TestApp::new();
    app.seed_projects(&["Keep", "Drop"]).await;
    let original = app.projects(1).get_by_id(2).await.expect("seeded");

    let repo = app.projects(5);
    repo.remove(original.clone()).await;
    repo.commit(&token()).await.expect("commit");

    let stored = repo.get_by_id_with_deleted(2).await.expect("still stored");
    assert!(stored.deletion.is_deleted);
    assert_eq!(stored.deletion.deleted_by_id, Some(5));
    assert_eq!(stored.audit, original.audit);

    assert!(repo.get_by_id(2).await.expect_err("hidden").is_not_found());
    let page = repo
        .query(None, &ListQuery::new(PageRequest::new(1, 10)), &token())
        .await
        .expect("query");
    assert_eq!(page.total_records, 1);
    assert!(page.data.iter().all(|p| p.id != 2));

    let all = repo
        .query(None, &ListQuery::new(PageRequest::new(1, 10)).with_deleted(), &token())
        .await
        .expect("query");
    assert_eq!(all.total_records, 2);
}

#[tokio::test]
async fn test_hard_delete_removes_activity() {
    let app = TestApp::new();
    let tasks = app.tasks(1);
    tasks.add(ProjectTask::new(1, "Install")).await;
    tasks.commit(&token()).await.expect("task");

    let repo = app.activities(3);
    repo.add(Activity::new(1, 3, Utc::now(), 1.5)).await;
    repo.commit(&token()).await.expect("insert");

    let activity = repo.get_by_id(1).await.expect("stored");
    repo.remove(activity).await;
    repo.commit(&token()).await.expect("delete");

    assert!(repo.get_by_id(1).await.expect_err("gone").is_not_found());
    assert!(
        repo.get_by_id_with_deleted(1)
            .await
            .expect_err("physically gone")
            .is_not_found()
    );
}
