//! Tracing-backed sinks for running without an LMS.

use async_trait::async_trait;

use sortable_core::traits::{GradeEvent, GradeSink, ProgressEvent, ProgressSink};

/// Writes each grade to the log instead of a grade service.
pub struct LogGradeSink;

#[async_trait]
impl GradeSink for LogGradeSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn publish(&self, event: &GradeEvent) -> anyhow::Result<()> {
        tracing::info!(
            problem = %event.problem_id,
            learner = %event.learner_id,
            earned = event.score.earned,
            possible = event.score.possible,
            only_if_higher = event.only_if_higher,
            "grade published"
        );
        Ok(())
    }
}

/// Writes each progress event to the log.
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn emit(&self, event: &ProgressEvent) {
        tracing::info!(
            id = %event.id,
            problem = %event.problem_id,
            learner = %event.learner_id,
            "progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortable_core::model::Score;

    #[tokio::test]
    async fn log_sink_always_accepts() {
        let event = GradeEvent {
            problem_id: "p".into(),
            learner_id: "alice".into(),
            score: Score::new(0.0, 1.0),
            raw_score: Score::new(0.0, 1.0),
            only_if_higher: false,
        };
        LogGradeSink.publish(&event).await.unwrap();
        TracingProgressSink.emit(&ProgressEvent::new("p", "alice"));
    }
}
