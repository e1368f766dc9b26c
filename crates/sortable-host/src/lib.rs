//! sortable-host: Host capabilities for the sortable engine.
//!
//! Implements the `StateStore`, `GradeSink`, `ProgressSink`, and `Translator`
//! traits over memory, JSON files, HTTP, and tracing, plus the configuration
//! that wires them together.

pub mod catalog;
pub mod config;
pub mod error;
pub mod file_store;
pub mod http;
pub mod logging;
pub mod memory;

pub use config::{create_grade_sink, create_translator, load_config, GradeSinkConfig, SortableConfig};
pub use error::HostError;
