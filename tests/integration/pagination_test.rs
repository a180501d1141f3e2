//! Paged query envelopes.

use pmo_core::config::PaginationConfig;
use pmo_core::traits::Repository;
use pmo_core::types::{ListQuery, PageRequest, SortDirection};

use crate::helpers::{TestApp, token};

#[tokio::test]
async fn test_second_page_of_twelve_by_title() {
    let app = TestApp::new();
    let titles = [
        "Title 07", "Title 03", "Title 11", "Title 01", "Title 09", "Title 12", "Title 05",
        "Title 02", "Title 10", "Title 04", "Title 08", "Title 06",
    ];
    app.seed_projects(&titles).await;

    let query = ListQuery::new(PageRequest::new(2, 5)).order_by("Title", SortDirection::Asc);
    let page = app
        .projects(1)
        .query(None, &query, &token())
        .await
        .expect("query");

    assert_eq!(page.total_records, 12);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.page, 2);
    assert_eq!(page.page_size, 5);
    let got: Vec<_> = page.data.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(got, vec!["Title 06", "Title 07", "Title 08", "Title 09", "Title 10"]);

    let json = serde_json::to_value(&page).expect("json");
    assert_eq!(json["total_pages"], 3);
}

#[tokio::test]
async fn test_filter_counts_only_matches() {
    let app = TestApp::new();
    app.seed_projects(&["Alpha", "Beta", "Alpine", "Gamma"]).await;

    let starts_al = |p: &pmo_entity::project::Project| p.title.starts_with("Al");
    let page = app
        .projects(1)
        .query(Some(&starts_al), &ListQuery::new(PageRequest::new(1, 1)), &token())
        .await
        .expect("query");
    assert_eq!(page.total_records, 2);
    assert_eq!(page.total_pages(), 2);
    assert!(page.has_next());
}

#[tokio::test]
async fn test_empty_result_has_zero_pages() {
    let app = TestApp::new();
    let page = app
        .projects(1)
        .query(None, &ListQuery::default(), &token())
        .await
        .expect("query");
    assert_eq!(page.total_records, 0);
    assert_eq!(page.total_pages(), 0);
}

#[test]
fn test_configured_limits_clamp_requests() {
    let limits = PaginationConfig {
        default_page_size: 20,
        max_page_size: 50,
    };
    assert_eq!(PageRequest::with_limits(0, None, &limits), PageRequest::new(1, 20));
    assert_eq!(PageRequest::with_limits(3, Some(500), &limits).page_size, 50);
}

#[tokio::test]
async fn test_wire_page_bounds_are_clamped() {
    let app = TestApp::new();
    app.seed_projects(&["Alpha", "Beta", "Gamma"]).await;

    let query: ListQuery = serde_json::from_str(r#"{"page":0,"page_size":0}"#).expect("query");
    let page = app
        .projects(1)
        .query(None, &query, &token())
        .await
        .expect("query");
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 1);
    assert_eq!(page.total_records, 3);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.data.len(), 1);
}
