//! Dynamic ordering through the repository and the free function.

use pmo_core::traits::Repository;
use pmo_core::types::{ListQuery, PageRequest, SortDirection};
use pmo_database::order_by;
use pmo_entity::project::Project;

use crate::helpers::{TestApp, token};

fn titles(items: &[Project]) -> Vec<&str> {
    items.iter().map(|p| p.title.as_str()).collect()
}

#[tokio::test]
async fn test_unknown_field_falls_back_to_identity() {
    let app = TestApp::new();
    app.seed_projects(&["Charlie", "Alpha", "Bravo"]).await;
    let repo = app.projects(1);
    let all = repo
        .query(None, &ListQuery::default(), &token())
        .await
        .expect("query")
        .data;

    let mut shuffled = all.clone();
    shuffled.reverse();
    let fallback = order_by(shuffled.clone(), Some("NoSuchField"), true);
    let identity = order_by(shuffled, None, false);
    assert_eq!(fallback, identity);
    assert_eq!(fallback.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_query_orders_case_insensitively() {
    let app = TestApp::new();
    app.seed_projects(&["Charlie", "Alpha", "Bravo"]).await;
    let repo = app.projects(1);

    let query = ListQuery::default().order_by("tItLe", SortDirection::Desc);
    let page = repo.query(None, &query, &token()).await.expect("query");
    assert_eq!(titles(&page.data), vec!["Charlie", "Bravo", "Alpha"]);

    let query = ListQuery::default().order_by("bogus", SortDirection::Desc);
    let page = repo.query(None, &query, &token()).await.expect("query");
    assert_eq!(titles(&page.data), vec!["Charlie", "Alpha", "Bravo"]);
}

#[tokio::test]
async fn test_page_order_is_stable_across_pages() {
    let app = TestApp::new();
    app.seed_projects(&["Same", "Same", "Same", "Other"]).await;
    let repo = app.projects(1);

    let mut seen = Vec::new();
    for page in 1..=2 {
        let query = ListQuery::new(PageRequest::new(page, 2)).order_by("Title", SortDirection::Asc);
        let result = repo.query(None, &query, &token()).await.expect("query");
        seen.extend(result.data.into_iter().map(|p| p.id));
    }
    assert_eq!(seen, vec![4, 1, 2, 3]);
}
