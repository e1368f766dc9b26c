//! Host capability traits.
//!
//! The engine never looks services up at runtime. A host builds a
//! [`HostServices`] bundle and hands it to the engine at construction. The
//! `sortable-host` crate provides file, memory, HTTP, and tracing backed
//! implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{LearnerState, ProblemDefinition, Score};

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Durable storage for problem definitions and per-learner state.
///
/// Implementations guarantee isolation between learners; the engine does
/// not lock anything itself.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load an authored problem, `None` if it was never saved.
    async fn load_problem(&self, problem_id: &str) -> anyhow::Result<Option<ProblemDefinition>>;

    /// Save an authored problem, keyed by its id.
    async fn save_problem(&self, problem: &ProblemDefinition) -> anyhow::Result<()>;

    /// Load a learner's state for a problem, `None` before the first save.
    async fn load_learner(
        &self,
        problem_id: &str,
        learner_id: &str,
    ) -> anyhow::Result<Option<LearnerState>>;

    /// Save a learner's state for a problem.
    async fn save_learner(
        &self,
        problem_id: &str,
        learner_id: &str,
        state: &LearnerState,
    ) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Grade publishing
// ---------------------------------------------------------------------------

/// Destination for learner grades.
#[async_trait]
pub trait GradeSink: Send + Sync {
    /// Human-readable sink name (e.g. "http").
    fn name(&self) -> &str;

    /// Publish one grade. Called once per accepted submission, never retried.
    async fn publish(&self, event: &GradeEvent) -> anyhow::Result<()>;
}

/// A grade reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEvent {
    pub problem_id: String,
    pub learner_id: String,
    /// Weighted score.
    pub score: Score,
    /// Unweighted score in [0, 1].
    pub raw_score: Score,
    /// When true the host keeps the previous grade if it was higher.
    pub only_if_higher: bool,
}

// ---------------------------------------------------------------------------
// Progress events
// ---------------------------------------------------------------------------

/// Fire-and-forget notification that a learner interacted with a problem.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: &ProgressEvent);
}

/// Emitted after every accepted submission, correct or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub id: Uuid,
    pub problem_id: String,
    pub learner_id: String,
    pub emitted_at: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn new(problem_id: &str, learner_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            problem_id: problem_id.to_string(),
            learner_id: learner_id.to_string(),
            emitted_at: Utc::now(),
        }
    }
}

/// Progress sink that drops every event.
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _: &ProgressEvent) {}
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// Localizes message ids.
pub trait Translator: Send + Sync {
    fn gettext(&self, msgid: &str) -> String;
}

/// Returns every message id unchanged. Used when the host has no translations.
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn gettext(&self, msgid: &str) -> String {
        msgid.to_string()
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Every capability the engine needs from its host.
#[derive(Clone)]
pub struct HostServices {
    pub store: Arc<dyn StateStore>,
    pub grades: Arc<dyn GradeSink>,
    pub progress: Arc<dyn ProgressSink>,
    pub translator: Arc<dyn Translator>,
}

impl HostServices {
    /// Bundle a store and grade sink with no-op progress and identity translation.
    pub fn new(store: Arc<dyn StateStore>, grades: Arc<dyn GradeSink>) -> Self {
        Self {
            store,
            grades,
            progress: Arc::new(NoopProgressSink),
            translator: Arc::new(IdentityTranslator),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_translator_returns_input() {
        assert_eq!(IdentityTranslator.gettext("Correct ({}/{})"), "Correct ({}/{})");
    }

    #[test]
    fn progress_events_get_unique_ids() {
        let a = ProgressEvent::new("p", "alice");
        let b = ProgressEvent::new("p", "alice");
        assert_ne!(a.id, b.id);
        assert_eq!(a.learner_id, "alice");
    }
}
