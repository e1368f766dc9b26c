//! In-memory host capabilities for tests and embedding.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use sortable_core::model::{LearnerState, ProblemDefinition};
use sortable_core::traits::{GradeEvent, GradeSink, ProgressEvent, ProgressSink, StateStore};

/// A `StateStore` that keeps everything in process memory.
#[derive(Default)]
pub struct MemoryStore {
    problems: Mutex<HashMap<String, ProblemDefinition>>,
    learners: Mutex<HashMap<(String, String), LearnerState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of learner records stored across all problems.
    pub fn learner_count(&self) -> usize {
        self.learners.lock().unwrap().len()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load_problem(&self, problem_id: &str) -> anyhow::Result<Option<ProblemDefinition>> {
        Ok(self.problems.lock().unwrap().get(problem_id).cloned())
    }

    async fn save_problem(&self, problem: &ProblemDefinition) -> anyhow::Result<()> {
        self.problems
            .lock()
            .unwrap()
            .insert(problem.id.clone(), problem.clone());
        Ok(())
    }

    async fn load_learner(
        &self,
        problem_id: &str,
        learner_id: &str,
    ) -> anyhow::Result<Option<LearnerState>> {
        let key = (problem_id.to_string(), learner_id.to_string());
        Ok(self.learners.lock().unwrap().get(&key).cloned())
    }

    async fn save_learner(
        &self,
        problem_id: &str,
        learner_id: &str,
        state: &LearnerState,
    ) -> anyhow::Result<()> {
        let key = (problem_id.to_string(), learner_id.to_string());
        self.learners.lock().unwrap().insert(key, state.clone());
        Ok(())
    }
}

/// A grade sink that records every published grade.
///
/// Can be told to fail so callers can exercise the error path.
#[derive(Default)]
pub struct RecordingGradeSink {
    events: Mutex<Vec<GradeEvent>>,
    failure: Option<String>,
}

impl RecordingGradeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every publish fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    /// Grades published so far.
    pub fn events(&self) -> Vec<GradeEvent> {
        self.events.lock().unwrap().clone()
    }

    /// The last grade published.
    pub fn last(&self) -> Option<GradeEvent> {
        self.events.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GradeSink for RecordingGradeSink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn publish(&self, event: &GradeEvent) -> anyhow::Result<()> {
        if let Some(message) = &self.failure {
            anyhow::bail!("{message}");
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A progress sink that records every event.
#[derive(Default)]
pub struct RecordingProgressSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn emit(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
