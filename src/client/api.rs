use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    domain::QuizQuestion,
    dto::{
        request::GenerateQuizRequestDto,
        response::{ApiErrorBody, GenerateQuizResponse},
    },
};

pub const GENERATION_FAILED: &str = "Failed to generate quiz. Try again.";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Longer than the service's own completion timeout so the service gets to
/// report its error first.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(150);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Generation(String),

    #[error("{}", GENERATION_FAILED)]
    Transport(#[from] reqwest::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &GenerateQuizRequestDto,
    ) -> Result<Vec<QuizQuestion>, ClientError>;
}

pub struct QuizApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl QuizApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl QuizGenerator for QuizApiClient {
    async fn generate(
        &self,
        request: &GenerateQuizRequestDto,
    ) -> Result<Vec<QuizQuestion>, ClientError> {
        let url = format!("{}/api/generate-quiz", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .inspect_err(|e| log::error!("Failed to reach quiz service at {}: {}", url, e))?;

        let status = response.status();
        let body = response.text().await?;
        parse_generation_response(status.is_success(), &body)
    }
}

/// Turns a service reply into questions. A non-2xx status, an unparseable
/// body or an empty question list all become a displayable error string.
pub fn parse_generation_response(
    success: bool,
    body: &str,
) -> Result<Vec<QuizQuestion>, ClientError> {
    if !success {
        let error = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| {
                if let Some(message) = &b.message {
                    log::info!("Quiz service error detail: {}", message);
                }
                b.error
            })
            .unwrap_or_else(|| GENERATION_FAILED.to_string());
        return Err(ClientError::Generation(error));
    }

    match serde_json::from_str::<GenerateQuizResponse>(body) {
        Ok(response) if !response.questions.is_empty() => Ok(response.questions),
        Ok(_) => Err(ClientError::Generation(GENERATION_FAILED.to_string())),
        Err(e) => {
            log::error!("Unexpected quiz service response: {}", e);
            Err(ClientError::Generation(GENERATION_FAILED.to_string()))
        }
    }
}
