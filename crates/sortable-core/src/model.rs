//! Core data model types for sortable.
//!
//! These are the fundamental types the grading engine works with: the
//! authored problem definition, per-learner state, and scores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SubmissionError;

/// Items shown when an author has not provided any.
pub const DEFAULT_ITEMS: [&str; 5] = ["Australia", "China", "Finland", "Pakistan", "United States"];

/// Default title shown to learners.
pub const DEFAULT_DISPLAY_NAME: &str = "Sorting Problem";

/// Default problem instructions.
pub const DEFAULT_QUESTION_TEXT: &str = "Sort the following country names in alphabetical order";

/// Default background color of sortable items.
pub const DEFAULT_ITEM_BACKGROUND_COLOR: &str = "#f2f2f2";

/// Default text color of sortable items.
pub const DEFAULT_ITEM_TEXT_COLOR: &str = "#000000";

/// The raw maximum score of a sorting problem. Always 1.
pub const MAX_RAW_SCORE: f64 = 1.0;

/// An authored sorting problem, shared by every learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDefinition {
    /// Identifier of this problem instance.
    pub id: String,
    /// Title displayed to learners.
    pub display_name: String,
    /// Description of the problem or instructions shown to the learner.
    pub question_text: String,
    /// Items in their correct (canonical) order.
    pub items: Vec<String>,
    /// Maximum attempts allowed, 0 for unlimited.
    pub max_attempts: u32,
    /// Number of points the problem is worth.
    pub weight: f64,
    /// Whether the problem counts towards the grade.
    pub graded: bool,
    /// Background color of sortable items.
    pub item_background_color: String,
    /// Text color of sortable items.
    pub item_text_color: String,
}

impl Default for ProblemDefinition {
    fn default() -> Self {
        Self {
            id: String::new(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            question_text: DEFAULT_QUESTION_TEXT.to_string(),
            items: DEFAULT_ITEMS.iter().map(|s| s.to_string()).collect(),
            max_attempts: 1,
            weight: 1.0,
            graded: true,
            item_background_color: DEFAULT_ITEM_BACKGROUND_COLOR.to_string(),
            item_text_color: DEFAULT_ITEM_TEXT_COLOR.to_string(),
        }
    }
}

impl ProblemDefinition {
    /// A default problem bound to the given id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Attempts left for a learner, `None` when attempts are unlimited.
    pub fn remaining_attempts(&self, attempts_used: u32) -> Option<u32> {
        if self.max_attempts == 0 {
            None
        } else {
            Some(self.max_attempts.saturating_sub(attempts_used))
        }
    }

    /// Whether a learner with `attempts_used` has no attempts left.
    pub fn attempts_exhausted(&self, attempts_used: u32) -> bool {
        self.remaining_attempts(attempts_used) == Some(0)
    }

    /// Reject definitions that cannot be graded or stored.
    ///
    /// Items must be non-empty and the weight finite and non-negative.
    pub fn validate(&self) -> Result<(), SubmissionError> {
        if self.items.is_empty() {
            return Err(SubmissionError::InvalidProblem("item list is empty".into()));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(SubmissionError::InvalidProblem(format!(
                "weight must be a non-negative number, got {}",
                self.weight
            )));
        }
        Ok(())
    }
}

/// Per-learner mutable state for one problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerState {
    /// Number of attempts the learner used.
    #[serde(default)]
    pub attempts_used: u32,
    /// Set once the learner solved the problem or ran out of attempts.
    #[serde(default)]
    pub completed: bool,
    /// Fraction of correctly placed items in the latest graded submission.
    #[serde(default)]
    pub raw_earned: f64,
    /// Raw maximum score; always 1 for this problem type.
    #[serde(default = "default_raw_possible")]
    pub raw_possible: f64,
    /// For each canonical item, its index in the last submitted order.
    #[serde(default)]
    pub last_submission_positions: Vec<usize>,
    /// When the last submission was accepted.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_raw_possible() -> f64 {
    MAX_RAW_SCORE
}

impl Default for LearnerState {
    fn default() -> Self {
        Self {
            attempts_used: 0,
            completed: false,
            raw_earned: 0.0,
            raw_possible: MAX_RAW_SCORE,
            last_submission_positions: Vec::new(),
            updated_at: None,
        }
    }
}

impl LearnerState {
    /// The learner's saved raw score.
    pub fn score(&self) -> Score {
        Score::new(self.raw_earned, self.raw_possible)
    }

    /// Whether the learner has submitted at least once and has stored positions.
    pub fn has_submission(&self) -> bool {
        self.attempts_used > 0 && !self.last_submission_positions.is_empty()
    }

    /// Whether the latest graded submission placed every item correctly.
    pub fn is_fully_correct(&self) -> bool {
        self.raw_earned >= self.raw_possible
    }
}

/// A score as an (earned, possible) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub earned: f64,
    pub possible: f64,
}

impl Score {
    pub fn new(earned: f64, possible: f64) -> Self {
        Self { earned, possible }
    }

    /// Scale both components by the problem weight.
    pub fn weighted(&self, weight: f64) -> Score {
        Score {
            earned: self.earned * weight,
            possible: self.possible * weight,
        }
    }
}

/// Structured update to every authored field, as sent by an editing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemUpdate {
    pub display_name: String,
    pub question_text: String,
    pub max_attempts: u32,
    pub weight: f64,
    #[serde(rename = "has_score")]
    pub graded: bool,
    pub item_background_color: String,
    pub item_text_color: String,
    #[serde(rename = "data")]
    pub items: Vec<String>,
}

impl ProblemUpdate {
    /// Snapshot the editable fields of an existing definition.
    pub fn from_problem(problem: &ProblemDefinition) -> Self {
        Self {
            display_name: problem.display_name.clone(),
            question_text: problem.question_text.clone(),
            max_attempts: problem.max_attempts,
            weight: problem.weight,
            graded: problem.graded,
            item_background_color: problem.item_background_color.clone(),
            item_text_color: problem.item_text_color.clone(),
            items: problem.items.clone(),
        }
    }

    /// Overwrite the authored fields of `problem`. The id is kept.
    pub fn apply_to(self, problem: &mut ProblemDefinition) {
        problem.display_name = self.display_name;
        problem.question_text = self.question_text;
        problem.max_attempts = self.max_attempts;
        problem.weight = self.weight;
        problem.graded = self.graded;
        problem.item_background_color = self.item_background_color;
        problem.item_text_color = self.item_text_color;
        problem.items = self.items;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_ungradable_definitions() {
        assert!(ProblemDefinition::with_id("ok").validate().is_ok());

        let weightless = ProblemDefinition {
            weight: 0.0,
            ..ProblemDefinition::with_id("zero")
        };
        assert!(weightless.validate().is_ok());

        for weight in [-3.0, f64::NAN, f64::INFINITY] {
            let problem = ProblemDefinition {
                weight,
                ..ProblemDefinition::with_id("bad")
            };
            let err = problem.validate().unwrap_err();
            assert!(matches!(err, SubmissionError::InvalidProblem(_)));
            assert!(err.to_string().contains("weight"), "weight {weight}");
        }

        let empty = ProblemDefinition {
            items: vec![],
            ..ProblemDefinition::with_id("empty")
        };
        let err = empty.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid problem: item list is empty");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn problem_defaults() {
        let problem = ProblemDefinition::default();
        assert_eq!(problem.items.len(), 5);
        assert_eq!(problem.items[0], "Australia");
        assert_eq!(problem.max_attempts, 1);
        assert_eq!(problem.weight, 1.0);
        assert!(problem.graded);
    }

    #[test]
    fn remaining_attempts_limited_and_unlimited() {
        let mut problem = ProblemDefinition::with_id("p");
        problem.max_attempts = 3;
        assert_eq!(problem.remaining_attempts(0), Some(3));
        assert_eq!(problem.remaining_attempts(3), Some(0));
        assert_eq!(problem.remaining_attempts(7), Some(0));
        assert!(problem.attempts_exhausted(3));

        problem.max_attempts = 0;
        assert_eq!(problem.remaining_attempts(100), None);
        assert!(!problem.attempts_exhausted(100));
    }

    #[test]
    fn weighted_score() {
        let score = Score::new(0.5, 1.0).weighted(2.0);
        assert_eq!(score.earned, 1.0);
        assert_eq!(score.possible, 2.0);
    }

    #[test]
    fn learner_state_deserializes_with_defaults() {
        let state: LearnerState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, LearnerState::default());
        assert_eq!(state.raw_possible, 1.0);
        assert!(!state.has_submission());
    }

    #[test]
    fn problem_update_uses_editor_keys() {
        let json = serde_json::json!({
            "display_name": "Planets",
            "question_text": "Sort by distance from the sun",
            "max_attempts": 2,
            "weight": 3.0,
            "has_score": false,
            "item_background_color": "#ffffff",
            "item_text_color": "#111111",
            "data": ["Mercury", "Venus", "Earth"],
        });
        let update: ProblemUpdate = serde_json::from_value(json).unwrap();
        let mut problem = ProblemDefinition::with_id("planets");
        update.apply_to(&mut problem);
        assert_eq!(problem.id, "planets");
        assert_eq!(problem.items, vec!["Mercury", "Venus", "Earth"]);
        assert!(!problem.graded);
        assert_eq!(problem.max_attempts, 2);
    }
}
