//! The `sortable submit` command.

use anyhow::Result;

use sortable_core::error::SubmissionError;

use super::{split_list, Context};

pub async fn execute(
    ctx: &Context,
    problem_id: &str,
    learner: &str,
    order: &str,
    json: bool,
) -> Result<()> {
    let engine = ctx.engine()?;
    let submission = split_list(order);

    let feedback = match engine.submit_answer(problem_id, learner, &submission).await {
        Ok(feedback) => feedback,
        Err(e @ SubmissionError::AttemptsExhausted { .. }) => {
            anyhow::bail!("{e} (status {})", e.status_code());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&feedback)?);
        return Ok(());
    }

    println!("{}", feedback.message);
    match feedback.remaining_attempts {
        Some(n) => println!("Attempts used: {} ({n} remaining)", feedback.attempts_used),
        None => println!("Attempts used: {}", feedback.attempts_used),
    }
    Ok(())
}
