//! Project summary report: task progress and logged hours per project.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use pmo_core::error::AppError;
use pmo_core::result::AppResult;
use pmo_core::traits::{ReportArtifact, ReportHandler, ReportRequest, Repository};
use pmo_core::types::{ActorId, EntityId};
use pmo_database::repositories::{ActivityRepository, ProjectRepository, TaskRepository};
use pmo_database::{Store, UnitOfWork};
use pmo_entity::project::Project;

/// Request parameter restricting the report to one project id.
pub const PROJECT_PARAMETER: &str = "project";

const HEADER: &str = "project_id,code,title,status,open_tasks,done_tasks,logged_hours";

/// One line of the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummaryRow {
    /// Project id.
    pub project_id: EntityId,
    /// Project code.
    pub code: String,
    /// Project title.
    pub title: String,
    /// Project status.
    pub status: &'static str,
    /// Live tasks not yet done.
    pub open_tasks: u64,
    /// Live tasks marked done.
    pub done_tasks: u64,
    /// Hours logged against the project's live tasks.
    pub logged_hours: f64,
}

/// Summarizes every live project as CSV.
#[derive(Debug, Clone)]
pub struct ProjectSummaryReport {
    store: Arc<dyn Store>,
}

impl ProjectSummaryReport {
    /// Report kind.
    pub const KIND: &'static str = "project-summary";

    /// Creates the handler over `store`.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Computes the summary rows, optionally for a single project.
    pub async fn rows(&self, project_id: Option<EntityId>) -> AppResult<Vec<ProjectSummaryRow>> {
        let uow = UnitOfWork::begin(Arc::clone(&self.store), ActorId::SYSTEM);
        let projects = ProjectRepository::new(Arc::clone(&uow));
        let tasks = TaskRepository::new(Arc::clone(&uow));
        let activities = ActivityRepository::new(uow);

        let projects: Vec<Project> = match project_id {
            Some(id) => vec![projects.get_by_id(id).await?],
            None => projects.list(None).await?,
        };

        let mut rows: Vec<ProjectSummaryRow> = projects
            .into_iter()
            .map(|p| ProjectSummaryRow {
                project_id: p.id,
                status: p.status.as_str(),
                code: p.code,
                title: p.title,
                open_tasks: 0,
                done_tasks: 0,
                logged_hours: 0.0,
            })
            .collect();
        let index: HashMap<EntityId, usize> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.project_id, i))
            .collect();

        let mut task_project = HashMap::new();
        for task in tasks.list(None).await? {
            let Some(&i) = index.get(&task.project_id) else {
                continue;
            };
            if task.is_done() {
                rows[i].done_tasks += 1;
            } else {
                rows[i].open_tasks += 1;
            }
            task_project.insert(task.id, i);
        }

        for activity in activities.list(None).await? {
            if let Some(&i) = task_project.get(&activity.task_id) {
                rows[i].logged_hours += activity.hours;
            }
        }

        debug!(projects = rows.len(), "Project summary computed");
        Ok(rows)
    }
}

/// Renders rows as CSV with a header line.
pub fn render_csv(rows: &[ProjectSummaryRow]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for row in rows {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{:.2}",
            row.project_id,
            csv_field(&row.code),
            csv_field(&row.title),
            row.status,
            row.open_tasks,
            row.done_tasks,
            row.logged_hours
        );
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn parse_project(request: &ReportRequest) -> AppResult<Option<EntityId>> {
    request
        .parameter(PROJECT_PARAMETER)
        .map(|raw| {
            raw.trim().parse::<EntityId>().map_err(|_| {
                AppError::validation(format!("Parameter '{PROJECT_PARAMETER}' must be an id, got '{raw}'"))
            })
        })
        .transpose()
}

#[async_trait]
impl ReportHandler for ProjectSummaryReport {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    async fn handle(&self, request: &ReportRequest) -> AppResult<ReportArtifact> {
        let project_id = parse_project(request)?;
        let rows = self.rows(project_id).await?;
        let generated_at = Utc::now();

        Ok(ReportArtifact {
            file_name: format!("project-summary-{}.csv", generated_at.format("%Y%m%d%H%M%S")),
            content_type: "text/csv".to_string(),
            content: render_csv(&rows).into_bytes(),
            generated_at,
        })
    }
}
