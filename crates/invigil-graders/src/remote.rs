//! Remote grading service client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use invigil_core::error::GraderError;
use invigil_core::traits::{parse_grade_line, AnswerGrader, GradeReply, GradeRequest};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the `grade-answers` collaborator.
///
/// The service answers with `{ "grades": [...] }` where each element is
/// either a `{score, feedback}` object or a delimited
/// `"{score}|{feedback}"` string; both shapes normalize to [`GradeReply`].
pub struct RemoteGrader {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl RemoteGrader {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self::with_timeout_secs(base_url, api_key, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout_secs(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
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
struct GradeAnswersRequest<'a> {
    topic: &'a str,
    answers: &'a [String],
}

#[derive(Deserialize)]
struct GradeAnswersResponse {
    grades: Vec<WireGrade>,
}

/// One per-answer element, in whichever shape the service chose.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireGrade {
    Structured {
        #[serde(default)]
        score: Option<serde_json::Value>,
        #[serde(default)]
        feedback: Option<String>,
    },
    Delimited(String),
    Other(serde_json::Value),
}

impl WireGrade {
    fn into_reply(self) -> GradeReply {
        match self {
            WireGrade::Structured { score, feedback } => GradeReply::Parsed {
                // Scores arrive as numbers or numeric strings; anything
                // else counts as zero, matching the service's own parser.
                score: score.as_ref().and_then(score_value_to_i64).unwrap_or(0),
                feedback: feedback.unwrap_or_default(),
            },
            WireGrade::Delimited(line) => parse_grade_line(&line),
            WireGrade::Other(_) => GradeReply::Unparsable,
        }
    }
}

fn score_value_to_i64(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[async_trait]
impl AnswerGrader for RemoteGrader {
    fn name(&self) -> &str {
        "remote"
    }

    #[instrument(skip(self, request), fields(topic = %request.topic, answers = request.answers.len()))]
    async fn grade_batch(&self, request: &GradeRequest) -> anyhow::Result<Vec<GradeReply>> {
        let body = GradeAnswersRequest {
            topic: &request.topic,
            answers: &request.answers,
        };

        let mut req = self
            .client
            .post(format!("{}/api/grade-answers", self.base_url))
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
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(GraderError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(GraderError::ApiError { status, message }.into());
        }

        let api_response: GradeAnswersResponse = response
            .json()
            .await
            .map_err(|e| GraderError::MalformedResponse(e.to_string()))?;

        Ok(api_response
            .grades
            .into_iter()
            .map(WireGrade::into_reply)
            .collect())
    }
}
