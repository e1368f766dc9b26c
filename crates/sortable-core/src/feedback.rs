//! Feedback message templates and the submission response payload.

use serde::{Deserialize, Serialize};

use crate::traits::Translator;

/// Template used when at least one item is misplaced.
pub const INCORRECT_TEMPLATE: &str = "Incorrect ({}/{})";

/// Template used when every item is in place.
pub const CORRECT_TEMPLATE: &str = "Correct ({}/{})";

/// Message returned when a learner has used every attempt.
pub const ATTEMPTS_EXHAUSTED_MESSAGE: &str = "Max number of attempts reached";

/// The fixed message set the engine is constructed with.
///
/// Templates use `{}` placeholders filled with earned and total points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessages {
    pub incorrect: String,
    pub correct: String,
    pub attempts_exhausted: String,
}

impl Default for FeedbackMessages {
    fn default() -> Self {
        Self {
            incorrect: INCORRECT_TEMPLATE.to_string(),
            correct: CORRECT_TEMPLATE.to_string(),
            attempts_exhausted: ATTEMPTS_EXHAUSTED_MESSAGE.to_string(),
        }
    }
}

impl FeedbackMessages {
    /// Run every message through the translator.
    pub fn translated(&self, translator: &dyn Translator) -> FeedbackMessages {
        FeedbackMessages {
            incorrect: translator.gettext(&self.incorrect),
            correct: translator.gettext(&self.correct),
            attempts_exhausted: translator.gettext(&self.attempts_exhausted),
        }
    }

    /// Pick a template by truncating the raw fraction to 0 or 1.
    ///
    /// Only an exact 1.0 selects the "correct" template.
    pub fn for_fraction(&self, raw_fraction: f64) -> &str {
        if raw_fraction.trunc() >= 1.0 {
            &self.correct
        } else {
            &self.incorrect
        }
    }

    /// Render the feedback line for a graded submission.
    pub fn render(&self, raw_fraction: f64, earned: f64, total: f64) -> String {
        fill_template(
            self.for_fraction(raw_fraction),
            &[&format_points(earned), &format_points(total)],
        )
    }
}

/// Format points the way learners have always seen them: integral values
/// keep one decimal (`2.0`), others use the shortest exact form.
pub fn format_points(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Fill `{}` placeholders left to right. Extra placeholders are kept verbatim.
pub fn fill_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    let mut args = args.iter();

    while let Some(idx) = rest.find("{}") {
        out.push_str(&rest[..idx]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("{}"),
        }
        rest = &rest[idx + 2..];
    }
    out.push_str(rest);
    out
}

/// Response payload of a graded submission.
///
/// Serialized with the keys the front-end reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionFeedback {
    /// Every item is in its canonical position.
    #[serde(rename = "correct")]
    pub is_fully_correct: bool,
    /// Attempts used, including this one.
    #[serde(rename = "attempts")]
    pub attempts_used: u32,
    /// Weighted points earned.
    #[serde(rename = "grade")]
    pub earned_points: f64,
    /// Attempts left; `None` when unlimited.
    pub remaining_attempts: Option<u32>,
    /// Stored positions of the canonical items within the submission.
    #[serde(rename = "state")]
    pub stored_positions: Vec<usize>,
    /// Localized feedback line.
    pub message: String,
}
