pub mod edit;
pub mod import;
pub mod init;
pub mod show;
pub mod submit;
pub mod validate;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use sortable_core::engine::SortableEngine;
use sortable_core::feedback::FeedbackMessages;
use sortable_core::traits::HostServices;
use sortable_host::config::load_config_from;
use sortable_host::file_store::JsonFileStore;
use sortable_host::logging::TracingProgressSink;
use sortable_host::{create_grade_sink, create_translator};

/// Options shared by every command.
pub struct Context {
    pub config: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
}

impl Context {
    /// Wire an engine from the config file and command-line overrides.
    pub fn engine(&self) -> Result<SortableEngine> {
        let config = load_config_from(self.config.as_deref())?;
        let state_dir = self
            .state_dir
            .clone()
            .unwrap_or_else(|| config.state_dir.clone());
        tracing::debug!("using state directory {}", state_dir.display());

        let host = HostServices::new(
            Arc::new(JsonFileStore::new(state_dir)),
            create_grade_sink(&config.grade_sink)?,
        )
        .with_progress(Arc::new(TracingProgressSink))
        .with_translator(create_translator(&config)?);

        Ok(SortableEngine::new(host, FeedbackMessages::default()))
    }
}

/// Split a comma-separated list, trimming whitespace around each entry.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(|item| item.trim().to_string()).collect()
}
