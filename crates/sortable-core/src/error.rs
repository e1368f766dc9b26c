//! Submission error types.
//!
//! The engine distinguishes expected, learner-facing rejections from
//! contract violations and host failures so a hosting runtime can map each
//! one to a response status without string matching.

use thiserror::Error;

/// Errors returned by the grading engine's entry points.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The learner has no attempts left. No state was changed.
    #[error("{message}")]
    AttemptsExhausted {
        attempts_used: u32,
        max_attempts: u32,
        message: String,
    },

    /// The submission is not a permutation of the problem's items.
    #[error("malformed submission: {0}")]
    MalformedSubmission(String),

    /// An authored update was rejected.
    #[error("invalid problem: {0}")]
    InvalidProblem(String),

    /// A host capability (persistence, grade sink) failed.
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

/// A learner asked to submit with no attempts remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no attempts remaining ({attempts_used}/{max_attempts} used)")]
pub struct AttemptsExhausted {
    pub attempts_used: u32,
    pub max_attempts: u32,
}

/// A submission that is not a permutation of the canonical items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MalformedSubmission(pub String);

impl From<MalformedSubmission> for SubmissionError {
    fn from(err: MalformedSubmission) -> Self {
        SubmissionError::MalformedSubmission(err.0)
    }
}

impl SubmissionError {
    /// HTTP-style status a host should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            SubmissionError::AttemptsExhausted { .. } => 409,
            SubmissionError::MalformedSubmission(_) | SubmissionError::InvalidProblem(_) => 400,
            SubmissionError::Host(_) => 500,
        }
    }

    /// Returns `true` for expected rejections that should be shown to the learner.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, SubmissionError::AttemptsExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let exhausted = SubmissionError::AttemptsExhausted {
            attempts_used: 1,
            max_attempts: 1,
            message: "Max number of attempts reached".into(),
        };
        assert_eq!(exhausted.status_code(), 409);
        assert!(exhausted.is_user_facing());
        assert_eq!(exhausted.to_string(), "Max number of attempts reached");

        let malformed = SubmissionError::MalformedSubmission("length 2, expected 3".into());
        assert_eq!(malformed.status_code(), 400);
        assert!(!malformed.is_user_facing());

        let host = SubmissionError::from(anyhow::anyhow!("grade sink unavailable"));
        assert_eq!(host.status_code(), 500);
        assert_eq!(host.to_string(), "grade sink unavailable");
    }
}
