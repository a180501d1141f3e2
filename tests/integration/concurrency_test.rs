//! Cancellation and conflicting writers.

use chrono::Utc;

use pmo_core::error::ErrorKind;
use pmo_core::traits::Repository;
use pmo_entity::activity::Activity;

use crate::helpers::{TestApp, token};

#[tokio::test]
async fn test_second_writer_gets_conflict() {
    let app = TestApp::new();
    let seed = app.activities(1);
    seed.add(Activity::new(1, 1, Utc::now(), 2.0)).await;
    seed.commit(&token()).await.expect("seed");

    let first = app.activities(1);
    let second = app.activities(2);
    let mine = first.get_by_id(1).await.expect("first read");
    let mut theirs = second.get_by_id(1).await.expect("second read");

    first.remove(mine).await;
    first.commit(&token()).await.expect("first commit");

    theirs.hours = 3.0;
    second.update(theirs).await;
    let err = second.commit(&token()).await.expect_err("conflict");
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(second.unit_of_work().pending_len().await, 1);
}

#[tokio::test]
async fn test_failed_batch_writes_nothing() {
    let app = TestApp::new();
    let repo = app.activities(1);
    repo.add(Activity::new(1, 1, Utc::now(), 1.0)).await;
    let mut ghost = Activity::new(1, 1, Utc::now(), 1.0);
    ghost.id = 404;
    repo.update(ghost).await;

    let err = repo.commit(&token()).await.expect_err("conflict");
    assert!(err.is_conflict());
    assert_eq!(repo.count(None).await.expect("count"), 0);
}

#[tokio::test]
async fn test_cancelled_commit_persists_nothing() {
    let app = TestApp::new();
    let repo = app.projects(1);
    repo.add(pmo_entity::project::Project::new("P-1", "Never")).await;

    let cancel = token();
    cancel.cancel();
    let err = repo.commit(&cancel).await.expect_err("cancelled");
    assert_eq!(err.kind, ErrorKind::Cancelled);
    assert_eq!(repo.count(None).await.expect("count"), 0);

    repo.commit(&token()).await.expect("retry");
    assert_eq!(repo.count(None).await.expect("count"), 1);
}
