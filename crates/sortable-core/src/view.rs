//! Student view context.
//!
//! Everything a host template needs to render the problem for one learner.

use serde::{Deserialize, Serialize};

use crate::grading::Presentation;
use crate::model::{LearnerState, ProblemDefinition};

/// One sortable item as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub label: String,
    /// The item sits at its canonical position in the learner's last submission.
    pub correct: bool,
}

/// Render context for the learner-facing view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentView {
    pub display_name: String,
    pub question_text: String,
    pub max_attempts: u32,
    pub attempts: u32,
    pub item_background_color: String,
    pub item_text_color: String,
    pub completed: bool,
    pub graded: bool,
    /// Weighted points earned.
    pub user_score: f64,
    /// Weighted points available.
    pub max_score: f64,
    /// Show the "correct" indicator.
    pub success_indicator: bool,
    /// Show the "incorrect" indicator.
    pub error_indicator: bool,
    /// Hint for the front-end to disable its submit button.
    pub submit_disabled: bool,
    pub items: Vec<ItemView>,
}

impl StudentView {
    pub fn new(problem: &ProblemDefinition, state: &LearnerState, presentation: Presentation) -> Self {
        let weighted = state.score().weighted(problem.weight);
        let submitted = state.attempts_used > 0;
        let fully_correct = state.is_fully_correct();

        let items = presentation
            .items
            .into_iter()
            .zip(presentation.correct)
            .map(|(label, correct)| ItemView { label, correct })
            .collect();

        Self {
            display_name: problem.display_name.clone(),
            question_text: problem.question_text.clone(),
            max_attempts: problem.max_attempts,
            attempts: state.attempts_used,
            item_background_color: problem.item_background_color.clone(),
            item_text_color: problem.item_text_color.clone(),
            completed: state.completed,
            graded: problem.graded,
            user_score: weighted.earned,
            max_score: weighted.possible,
            success_indicator: submitted && fully_correct,
            error_indicator: submitted && !fully_correct,
            submit_disabled: problem.attempts_exhausted(state.attempts_used)
                || (submitted && fully_correct),
            items,
        }
    }
}
