//! Report dispatch over stored data.

use std::sync::Arc;

use chrono::Utc;

use pmo_core::traits::{ReportRequest, Repository};
use pmo_entity::activity::Activity;
use pmo_entity::task::ProjectTask;
use pmo_service::{ProjectSummaryReport, ReportService};

use crate::helpers::{TestApp, token};

#[tokio::test]
async fn test_project_summary_through_service() {
    let app = TestApp::new();
    app.seed_projects(&["Rollout"]).await;
    let tasks = app.tasks(1);
    tasks.add(ProjectTask::new(1, "Install")).await;
    tasks.commit(&token()).await.expect("tasks");
    let activities = app.activities(1);
    activities.add(Activity::new(1, 1, Utc::now(), 2.25)).await;
    activities.commit(&token()).await.expect("activities");

    let service = ReportService::new();
    service
        .register(Arc::new(ProjectSummaryReport::new(Arc::clone(&app.store))))
        .await;

    let artifact = service
        .generate(&ReportRequest::new(ProjectSummaryReport::KIND))
        .await
        .expect("report");
    let text = String::from_utf8(artifact.content).expect("utf8");
    assert!(text.lines().any(|l| l == "1,P-00,Rollout,planned,1,0,2.25"));

    let err = service
        .generate(&ReportRequest::new("unknown"))
        .await
        .expect_err("unknown kind");
    assert!(err.is_not_found());
}
