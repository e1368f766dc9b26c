//! Position-based grading of sorting submissions.
//!
//! Everything here is pure: functions take the authored items and the
//! learner's state and return new values. Persistence and grade publishing
//! happen in the [`engine`](crate::engine).

use std::collections::HashMap;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{AttemptsExhausted, MalformedSubmission};
use crate::feedback::{FeedbackMessages, SubmissionFeedback};
use crate::model::{LearnerState, ProblemDefinition, Score, MAX_RAW_SCORE};

/// Items in display order, each paired with a correctness flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub items: Vec<String>,
    pub correct: Vec<bool>,
}

/// Build the order a learner sees.
///
/// Before the first submission the items are shuffled and no flags are set.
/// Afterwards the learner's last submitted order is rebuilt from the stored
/// positions, and position `i` is flagged correct when `positions[i] == i`.
/// Stored positions that no longer fit the item list (an author edited it)
/// are treated as no submission.
pub fn render_presentation<R: Rng + ?Sized>(
    canonical: &[String],
    state: &LearnerState,
    rng: &mut R,
) -> Presentation {
    if state.has_submission() {
        if let Some(items) = reorder_by_positions(canonical, &state.last_submission_positions) {
            let correct = state
                .last_submission_positions
                .iter()
                .enumerate()
                .map(|(i, &pos)| pos == i)
                .collect();
            return Presentation { items, correct };
        }
        tracing::debug!(
            stored = state.last_submission_positions.len(),
            items = canonical.len(),
            "stored positions do not match the item list, reshuffling"
        );
    }

    let mut items = canonical.to_vec();
    items.shuffle(rng);
    let correct = vec![false; items.len()];
    Presentation { items, correct }
}

/// Rebuild a submitted order from stored positions.
///
/// Returns `None` unless `positions` is a permutation of `0..canonical.len()`.
pub fn reorder_by_positions(canonical: &[String], positions: &[usize]) -> Option<Vec<String>> {
    if positions.len() != canonical.len() {
        return None;
    }
    let mut slots: Vec<Option<String>> = vec![None; canonical.len()];
    for (item, &pos) in canonical.iter().zip(positions) {
        let slot = slots.get_mut(pos)?;
        if slot.is_some() {
            return None;
        }
        *slot = Some(item.clone());
    }
    slots.into_iter().collect()
}

/// Reject a submission when the learner has no attempts left.
///
/// `max_attempts == 0` means unlimited and never fails.
pub fn validate_attempt(attempts_used: u32, max_attempts: u32) -> Result<(), AttemptsExhausted> {
    if max_attempts > 0 && attempts_used >= max_attempts {
        return Err(AttemptsExhausted {
            attempts_used,
            max_attempts,
        });
    }
    Ok(())
}

/// Check that `submitted` holds exactly the canonical items.
fn ensure_permutation(canonical: &[String], submitted: &[String]) -> Result<(), MalformedSubmission> {
    if canonical.is_empty() {
        return Err(MalformedSubmission("problem has no items".into()));
    }
    if submitted.len() != canonical.len() {
        return Err(MalformedSubmission(format!(
            "expected {} items, got {}",
            canonical.len(),
            submitted.len()
        )));
    }

    let mut counts: HashMap<&str, i64> = HashMap::new();
    for item in canonical {
        *counts.entry(item.as_str()).or_default() += 1;
    }
    for item in submitted {
        match counts.get_mut(item.as_str()) {
            Some(n) if *n > 0 => *n -= 1,
            _ => {
                return Err(MalformedSubmission(format!("unexpected item: {item:?}")));
            }
        }
    }
    Ok(())
}

/// Fraction of positions where the submission matches the canonical order.
pub fn grade_submission(canonical: &[String], submitted: &[String]) -> Result<f64, MalformedSubmission> {
    ensure_permutation(canonical, submitted)?;
    let correct = canonical
        .iter()
        .zip(submitted)
        .filter(|(expected, actual)| expected == actual)
        .count();
    Ok(correct as f64 / canonical.len() as f64)
}

/// For each canonical item, its index within `submitted`.
///
/// Repeated labels take their occurrences left to right, so the result is
/// always a permutation.
pub fn submission_positions(
    canonical: &[String],
    submitted: &[String],
) -> Result<Vec<usize>, MalformedSubmission> {
    ensure_permutation(canonical, submitted)?;
    let mut used = vec![false; submitted.len()];
    let mut positions = Vec::with_capacity(canonical.len());
    for item in canonical {
        let pos = submitted
            .iter()
            .enumerate()
            .position(|(j, candidate)| !used[j] && candidate == item)
            .ok_or_else(|| MalformedSubmission(format!("missing item: {item:?}")))?;
        used[pos] = true;
        positions.push(pos);
    }
    Ok(positions)
}

/// Result of grading one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    /// State to persist.
    pub state: LearnerState,
    /// Weighted score.
    pub score: Score,
    /// Response payload.
    pub feedback: SubmissionFeedback,
}

/// Grade a submission and compute the learner's next state.
///
/// The caller must have run [`validate_attempt`] first. The latest fraction
/// replaces the stored score even when it is lower, and a completed problem
/// may be resubmitted while attempts remain.
pub fn apply_submission(
    problem: &ProblemDefinition,
    state: &LearnerState,
    submitted: &[String],
    messages: &FeedbackMessages,
) -> Result<SubmissionOutcome, MalformedSubmission> {
    let fraction = grade_submission(&problem.items, submitted)?;
    let positions = submission_positions(&problem.items, submitted)?;

    let attempts_used = state.attempts_used.saturating_add(1);
    let completed =
        state.completed || fraction >= MAX_RAW_SCORE || problem.attempts_exhausted(attempts_used);

    let next = LearnerState {
        attempts_used,
        completed,
        raw_earned: fraction,
        raw_possible: MAX_RAW_SCORE,
        last_submission_positions: positions,
        updated_at: Some(Utc::now()),
    };

    let score = next.score().weighted(problem.weight);
    tracing::debug!(
        problem = %problem.id,
        attempts_used,
        fraction,
        earned = score.earned,
        "graded submission"
    );

    let feedback = SubmissionFeedback {
        is_fully_correct: next.is_fully_correct(),
        attempts_used,
        earned_points: score.earned,
        remaining_attempts: problem.remaining_attempts(attempts_used),
        stored_positions: next.last_submission_positions.clone(),
        message: messages.render(fraction, score.earned, score.possible),
    };

    Ok(SubmissionOutcome {
        state: next,
        score,
        feedback,
    })
}
