//! JSON file backed persistence.
//!
//! Layout under the state directory:
//!
//! ```text
//! problems/<problem>.json
//! learners/<problem>/<learner>.json
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use sortable_core::model::{LearnerState, ProblemDefinition};
use sortable_core::traits::StateStore;

/// A `StateStore` writing one JSON document per record.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn problem_path(&self, problem_id: &str) -> PathBuf {
        self.root
            .join("problems")
            .join(format!("{}.json", file_key(problem_id)))
    }

    fn learner_path(&self, problem_id: &str, learner_id: &str) -> PathBuf {
        self.root
            .join("learners")
            .join(file_key(problem_id))
            .join(format!("{}.json", file_key(learner_id)))
    }
}

/// Map an identifier to a file-safe name. Distinct ids stay distinct.
fn file_key(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for b in id.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    if out.is_empty() {
        out.push('%');
    }
    out
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Write via a temporary sibling and rename, so readers never see a partial file.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json)
        .await
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("failed to move {} into place", path.display()))?;
    Ok(())
}

#[async_trait]
impl StateStore for JsonFileStore {
    #[instrument(skip(self))]
    async fn load_problem(&self, problem_id: &str) -> Result<Option<ProblemDefinition>> {
        read_json(&self.problem_path(problem_id)).await
    }

    #[instrument(skip(self, problem), fields(problem_id = %problem.id))]
    async fn save_problem(&self, problem: &ProblemDefinition) -> Result<()> {
        write_json(&self.problem_path(&problem.id), problem).await
    }

    #[instrument(skip(self))]
    async fn load_learner(&self, problem_id: &str, learner_id: &str) -> Result<Option<LearnerState>> {
        read_json(&self.learner_path(problem_id, learner_id)).await
    }

    #[instrument(skip(self, state))]
    async fn save_learner(
        &self,
        problem_id: &str,
        learner_id: &str,
        state: &LearnerState,
    ) -> Result<()> {
        write_json(&self.learner_path(problem_id, learner_id), state).await
    }
}
