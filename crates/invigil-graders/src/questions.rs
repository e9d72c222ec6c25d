//! Remote question-generation client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use invigil_core::error::GraderError;
use invigil_core::traits::{QuestionSource, MAX_GENERATED_QUESTIONS};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the `generate-questions` collaborator.
pub struct RemoteQuestionSource {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl RemoteQuestionSource {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }
}

#[derive(Serialize)]
struct GenerateQuestionsRequest<'a> {
    topic: &'a str,
    regenerate: u32,
}

#[derive(Deserialize)]
struct GenerateQuestionsResponse {
    #[serde(default)]
    questions: Vec<String>,
}

#[async_trait]
impl QuestionSource for RemoteQuestionSource {
    #[instrument(skip(self), fields(topic = %topic, regeneration))]
    async fn generate(&self, topic: &str, regeneration: u32) -> anyhow::Result<Vec<String>> {
        let body = GenerateQuestionsRequest {
            topic,
            regenerate: regeneration,
        };

        let mut req = self
            .client
            .post(format!("{}/api/generate-questions", self.base_url))
            .header("content-type", "application/json");

        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let response = req.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                GraderError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                GraderError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(GraderError::ApiError { status, message }.into());
        }

        let api_response: GenerateQuestionsResponse = response
            .json()
            .await
            .map_err(|e| GraderError::MalformedResponse(e.to_string()))?;

        let mut questions: Vec<String> = api_response
            .questions
            .into_iter()
            .filter(|q| !q.trim().is_empty())
            .collect();

        if questions.is_empty() {
            anyhow::bail!("no questions generated for topic '{topic}'");
        }

        if questions.len() > MAX_GENERATED_QUESTIONS {
            tracing::warn!(
                got = questions.len(),
                keeping = MAX_GENERATED_QUESTIONS,
                "service returned more questions than requested"
            );
            questions.truncate(MAX_GENERATED_QUESTIONS);
        }

        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_generated_questions() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "questions": [
                "Define a directed acyclic graph.",
                "When would you prefer BFS over DFS?"
            ]
        });

        Mock::given(method("POST"))
            .and(path("/api/generate-questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let source = RemoteQuestionSource::new(&server.uri(), None);
        let questions = source.generate("Graphs", 0).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions[0].contains("acyclic"));
    }

    #[tokio::test]
    async fn zero_questions_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate-questions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "questions": [] })),
            )
            .mount(&server)
            .await;

        let source = RemoteQuestionSource::new(&server.uri(), None);
        let err = source.generate("Graphs", 2).await.unwrap_err();
        assert!(err.to_string().contains("no questions generated"));
    }

    #[tokio::test]
    async fn blank_questions_are_dropped() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "questions": ["  ", "Real question?", ""]
        });

        Mock::given(method("POST"))
            .and(path("/api/generate-questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let source = RemoteQuestionSource::new(&server.uri(), None);
        let questions = source.generate("Graphs", 0).await.unwrap();
        assert_eq!(questions, vec!["Real question?"]);
    }

    #[tokio::test]
    async fn oversized_batches_are_truncated() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "questions": ["q1", "q2", "q3", "q4", "q5", "q6", "q7"]
        });

        Mock::given(method("POST"))
            .and(path("/api/generate-questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let source = RemoteQuestionSource::new(&server.uri(), None);
        let questions = source.generate("Graphs", 0).await.unwrap();
        assert_eq!(questions.len(), MAX_GENERATED_QUESTIONS);
    }

    #[tokio::test]
    async fn server_error_is_classified() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate-questions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let source = RemoteQuestionSource::new(&server.uri(), None);
        let err = source.generate("Graphs", 0).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GraderError>(),
            Some(GraderError::ApiError { status: 503, .. })
        ));
    }
}
