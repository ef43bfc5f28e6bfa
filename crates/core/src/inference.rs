use crate::error::AnalysisError;
use crate::models::Answer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_SUMMARY_MODEL: &str = "facebook/bart-large-cnn";
pub const DEFAULT_ANSWER_MODEL: &str = "distilbert-base-cased-distilled-squad";
pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(60);

#[async_trait]
pub trait SummaryModel: Send + Sync {
    async fn condense(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String, AnalysisError>;
}

#[async_trait]
pub trait AnswerModel: Send + Sync {
    async fn answer_span(&self, question: &str, context: &str) -> Result<Answer, AnalysisError>;
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub summary_model: String,
    pub answer_model: String,
    pub timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".to_string(),
            api_key: None,
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            answer_model: DEFAULT_ANSWER_MODEL.to_string(),
            timeout: DEFAULT_INFERENCE_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    model: &'a str,
    text: &'a str,
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    summary_text: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    model: &'a str,
    question: &'a str,
    context: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnswerResponse {
    answer: Option<String>,
    score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    summary_model: String,
    answer_model: String,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Result<Self, AnalysisError> {
        Url::parse(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            summary_model: config.summary_model,
            answer_model: config.answer_model,
        })
    }

    fn endpoint(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url, operation)
    }

    async fn post_json<T: Serialize>(
        &self,
        operation: &str,
        payload: &T,
    ) -> Result<reqwest::Response, AnalysisError> {
        let endpoint = self.endpoint(operation);
        let mut request = self.http.post(&endpoint).json(payload);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|error| {
            if error.is_timeout() {
                AnalysisError::Timeout(format!("inference request to {endpoint} timed out"))
            } else {
                AnalysisError::ModelUnavailable(format!(
                    "inference endpoint {endpoint} unreachable: {error}"
                ))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Request(format!(
                "inference endpoint {endpoint} returned {status}: {body}"
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl SummaryModel for InferenceClient {
    async fn condense(
        &self,
        text: &str,
        max_length: usize,
        min_length: usize,
    ) -> Result<String, AnalysisError> {
        let payload = SummarizeRequest {
            model: &self.summary_model,
            text,
            max_length,
            min_length,
            do_sample: false,
        };

        let response = self.post_json("summarize", &payload).await?;
        let body: SummarizeResponse = response.json().await.map_err(|error| {
            AnalysisError::InvalidResponse(format!("summarize response is not json: {error}"))
        })?;

        match body.summary_text {
            Some(summary) => Ok(summary.trim().to_string()),
            None => Err(AnalysisError::InvalidResponse(
                "summarize response is missing summary_text".to_string(),
            )),
        }
    }
}

#[async_trait]
impl AnswerModel for InferenceClient {
    async fn answer_span(&self, question: &str, context: &str) -> Result<Answer, AnalysisError> {
        let payload = AnswerRequest {
            model: &self.answer_model,
            question,
            context,
        };

        let response = self.post_json("answer", &payload).await?;
        let body: AnswerResponse = response.json().await.map_err(|error| {
            AnalysisError::InvalidResponse(format!("answer response is not json: {error}"))
        })?;

        let text = body.answer.ok_or_else(|| {
            AnalysisError::InvalidResponse("answer response is missing answer".to_string())
        })?;
        Ok(Answer {
            text,
            score: body.score.unwrap_or(0.0),
        })
    }
}
