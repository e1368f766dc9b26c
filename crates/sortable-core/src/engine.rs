//! The grading engine.
//!
//! Binds the pure grading functions to the host's persistence, grade sink,
//! progress, and translation capabilities. One call handles one learner
//! request; the host serializes requests for the same learner.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::SubmissionError;
use crate::feedback::{FeedbackMessages, SubmissionFeedback};
use crate::grading::{apply_submission, render_presentation, validate_attempt};
use crate::model::{LearnerState, ProblemDefinition, ProblemUpdate};
use crate::traits::{GradeEvent, HostServices, ProgressEvent};
use crate::view::StudentView;

/// Acknowledgement of a published grade, in raw (unweighted) units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeReceipt {
    pub grade: f64,
    pub max_grade: f64,
}

/// The sorting problem engine.
pub struct SortableEngine {
    host: HostServices,
    messages: FeedbackMessages,
}

impl SortableEngine {
    pub fn new(host: HostServices, messages: FeedbackMessages) -> Self {
        Self { host, messages }
    }

    /// The host capabilities this engine was built with.
    pub fn host(&self) -> &HostServices {
        &self.host
    }

    /// Load a problem, falling back to the default definition.
    pub async fn problem(&self, problem_id: &str) -> Result<ProblemDefinition> {
        let stored = self
            .host
            .store
            .load_problem(problem_id)
            .await
            .with_context(|| format!("failed to load problem '{problem_id}'"))?;
        Ok(stored.unwrap_or_else(|| ProblemDefinition::with_id(problem_id)))
    }

    /// Load a learner's state, falling back to a fresh one.
    pub async fn learner_state(&self, problem_id: &str, learner_id: &str) -> Result<LearnerState> {
        let stored = self
            .host
            .store
            .load_learner(problem_id, learner_id)
            .await
            .with_context(|| format!("failed to load state of '{learner_id}' for '{problem_id}'"))?;
        Ok(stored.unwrap_or_default())
    }

    /// Save an authored definition after checking it can be graded.
    pub async fn install_problem(&self, problem: &ProblemDefinition) -> Result<()> {
        problem.validate()?;
        self.host
            .store
            .save_problem(problem)
            .await
            .with_context(|| format!("failed to save problem '{}'", problem.id))
    }

    /// Build the learner-facing view. Items are shuffled until the learner
    /// submits, then shown in their last submitted order.
    #[instrument(skip(self))]
    pub async fn student_view(&self, problem_id: &str, learner_id: &str) -> Result<StudentView> {
        let problem = self.problem(problem_id).await?;
        let state = self.learner_state(problem_id, learner_id).await?;
        let presentation = render_presentation(&problem.items, &state, &mut rand::rng());
        Ok(StudentView::new(&problem, &state, presentation))
    }

    /// Grade a learner's proposed order.
    ///
    /// Rejections (no attempts left, malformed submission) leave the stored
    /// state untouched. A grade sink failure aborts the request before the
    /// new state is saved.
    #[instrument(skip(self, submission), fields(items = submission.len()))]
    pub async fn submit_answer(
        &self,
        problem_id: &str,
        learner_id: &str,
        submission: &[String],
    ) -> Result<SubmissionFeedback, SubmissionError> {
        let problem = self.problem(problem_id).await?;
        let state = self.learner_state(problem_id, learner_id).await?;

        if let Err(exhausted) = validate_attempt(state.attempts_used, problem.max_attempts) {
            tracing::info!("{exhausted}");
            return Err(SubmissionError::AttemptsExhausted {
                attempts_used: exhausted.attempts_used,
                max_attempts: exhausted.max_attempts,
                message: self.host.translator.gettext(&self.messages.attempts_exhausted),
            });
        }

        let messages = self.messages.translated(self.host.translator.as_ref());
        let outcome = apply_submission(&problem, &state, submission, &messages)?;

        self.host
            .grades
            .publish(&GradeEvent {
                problem_id: problem_id.to_string(),
                learner_id: learner_id.to_string(),
                score: outcome.score,
                raw_score: outcome.state.score(),
                only_if_higher: false,
            })
            .await
            .with_context(|| format!("failed to publish grade via {}", self.host.grades.name()))?;

        self.host
            .store
            .save_learner(problem_id, learner_id, &outcome.state)
            .await
            .with_context(|| format!("failed to save state of '{learner_id}' for '{problem_id}'"))?;

        self.host
            .progress
            .emit(&ProgressEvent::new(problem_id, learner_id));

        tracing::info!(
            attempts = outcome.state.attempts_used,
            correct = outcome.feedback.is_fully_correct,
            grade = outcome.feedback.earned_points,
            "submission graded"
        );
        Ok(outcome.feedback)
    }

    /// Re-publish a learner's stored score.
    #[instrument(skip(self))]
    pub async fn publish_grade(&self, problem_id: &str, learner_id: &str) -> Result<GradeReceipt> {
        let problem = self.problem(problem_id).await?;
        let state = self.learner_state(problem_id, learner_id).await?;
        let raw = state.score();

        self.host
            .grades
            .publish(&GradeEvent {
                problem_id: problem_id.to_string(),
                learner_id: learner_id.to_string(),
                score: raw.weighted(problem.weight),
                raw_score: raw,
                only_if_higher: false,
            })
            .await
            .with_context(|| format!("failed to publish grade via {}", self.host.grades.name()))?;

        Ok(GradeReceipt {
            grade: raw.earned,
            max_grade: raw.possible,
        })
    }

    /// Apply an author's edit to every field of the problem.
    #[instrument(skip(self, update))]
    pub async fn studio_submit(
        &self,
        problem_id: &str,
        update: ProblemUpdate,
    ) -> Result<(), SubmissionError> {
        let mut problem = self.problem(problem_id).await?;
        update.apply_to(&mut problem);
        problem.validate()?;
        self.install_problem(&problem).await?;
        tracing::info!(items = problem.items.len(), "problem updated");
        Ok(())
    }
}
