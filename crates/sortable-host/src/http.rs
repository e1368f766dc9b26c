//! HTTP grade sink.
//!
//! Posts each grade as JSON to `{base_url}/grades`. One request per grade,
//! no retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

use sortable_core::traits::{GradeEvent, GradeSink};

use crate::error::HostError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Grade sink backed by an LMS grade endpoint.
pub struct HttpGradeSink {
    base_url: String,
    token: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpGradeSink {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        base_url: &str,
        token: Option<String>,
        timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            timeout_secs,
            client,
        })
    }
}

#[derive(Serialize)]
struct GradeRequest<'a> {
    problem_id: &'a str,
    learner_id: &'a str,
    earned: f64,
    possible: f64,
    raw_earned: f64,
    raw_possible: f64,
    only_if_higher: bool,
}

#[async_trait]
impl GradeSink for HttpGradeSink {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, event), fields(problem = %event.problem_id, learner = %event.learner_id))]
    async fn publish(&self, event: &GradeEvent) -> anyhow::Result<()> {
        let body = GradeRequest {
            problem_id: &event.problem_id,
            learner_id: &event.learner_id,
            earned: event.score.earned,
            possible: event.score.possible,
            raw_earned: event.raw_score.earned,
            raw_possible: event.raw_score.possible,
            only_if_higher: event.only_if_higher,
        };

        let mut request = self
            .client
            .post(format!("{}/grades", self.base_url))
            .header("content-type", "application/json")
            .json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                HostError::Timeout(self.timeout_secs)
            } else {
                HostError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(HostError::Unauthorized(body).into());
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(HostError::Rejected { status, message }.into());
        }

        tracing::debug!(status, "grade accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortable_core::model::Score;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn event() -> GradeEvent {
        GradeEvent {
            problem_id: "countries".into(),
            learner_id: "alice".into(),
            score: Score::new(1.0, 2.0),
            raw_score: Score::new(0.5, 1.0),
            only_if_higher: false,
        }
    }

    #[tokio::test]
    async fn successful_publish() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/grades"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(serde_json::json!({
                "problem_id": "countries",
                "learner_id": "alice",
                "earned": 1.0,
                "possible": 2.0,
                "raw_earned": 0.5,
                "raw_possible": 1.0,
                "only_if_higher": false,
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let sink = HttpGradeSink::new(&format!("{}/", server.uri()), Some("secret".into())).unwrap();
        sink.publish(&event()).await.unwrap();
    }

    #[tokio::test]
    async fn unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/grades"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let sink = HttpGradeSink::new(&server.uri(), Some("wrong".into())).unwrap();
        let err = sink.publish(&event()).await.unwrap_err();
        assert!(err.to_string().contains("unauthorized"));
        assert!(matches!(
            err.downcast_ref::<HostError>(),
            Some(HostError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn rejected_grade_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/grades"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let sink = HttpGradeSink::new(&server.uri(), None).unwrap();
        let err = sink.publish(&event()).await.unwrap_err();
        assert!(err.to_string().contains("HTTP 503"));
        assert!(err.to_string().contains("maintenance"));
    }
}
