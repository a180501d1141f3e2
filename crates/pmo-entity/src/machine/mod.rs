//! Machine domain entities.

pub mod model;

pub use model::Machine;
