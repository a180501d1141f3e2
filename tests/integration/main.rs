//! Integration tests for the PMO persistence core.

mod helpers;

mod audit_test;
mod concurrency_test;
mod ordering_test;
mod pagination_test;
mod report_test;
mod soft_delete_test;
