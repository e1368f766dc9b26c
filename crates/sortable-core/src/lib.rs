//! sortable-core: Grading engine, data model, and host capability traits.
//!
//! This crate defines the data model of a sorting problem, the pure
//! position-based grading functions, and the engine that binds them to the
//! persistence, grade, progress, and translation capabilities of a host.

pub mod engine;
pub mod error;
pub mod feedback;
pub mod grading;
pub mod model;
pub mod parser;
pub mod traits;
pub mod view;
