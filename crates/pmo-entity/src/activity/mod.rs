//! Logged work activities.

pub mod model;

pub use model::Activity;
