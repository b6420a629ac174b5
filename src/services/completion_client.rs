use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use secrecy::ExposeSecret as _;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    services::prompt_builder::QuizPrompt,
};

/// Text-in, text-out access to a chat-completion model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the raw content of the first choice.
    async fn complete(&self, prompt: &QuizPrompt) -> AppResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: ChatChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
    }
}

/// OpenAI-compatible completion client (OpenRouter by default).
///
/// Built without a client when no API key is configured, in which case every
/// call fails with [`AppError::UpstreamUnavailable`] before any network I/O.
pub struct OpenAiCompletionClient {
    client: Option<Client<OpenAIConfig>>,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl OpenAiCompletionClient {
    pub fn new(config: &Config) -> Self {
        let client = config.completion_api_key.as_ref().map(|api_key| {
            let openai_config = OpenAIConfig::new()
                .with_api_base(config.completion_api_base.clone())
                .with_api_key(api_key.expose_secret().to_string());
            let openai_config = with_attribution(
                openai_config,
                &config.completion_referer,
                &config.completion_title,
            );
            // A failed call is reported straight away instead of being retried.
            Client::with_config(openai_config).with_backoff(
                ExponentialBackoffBuilder::new()
                    .with_max_elapsed_time(Some(Duration::ZERO))
                    .build(),
            )
        });

        Self {
            client,
            model: config.completion_model.clone(),
            temperature: config.completion_temperature,
            timeout: config.completion_timeout(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

/// OpenRouter attribution headers. A value that is not a valid header is
/// skipped with a warning.
fn with_attribution(config: OpenAIConfig, referer: &str, title: &str) -> OpenAIConfig {
    [("http-referer", referer), ("x-title", title)]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .fold(config, |config, (name, value)| {
            match config.clone().with_header(name, value.to_string()) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Skipping {} header: {}", name, e);
                    config
                }
            }
        })
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, prompt: &QuizPrompt) -> AppResult<String> {
        let client = self.client.as_ref().ok_or_else(|| {
            log::error!("Completion API key is not configured");
            AppError::UpstreamUnavailable("Missing completion API key".to_string())
        })?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
        };

        log::info!("Sending request to completion API (model {})", self.model);

        let response: ChatCompletionResponse =
            tokio::time::timeout(self.timeout, client.chat().create_byot(request))
                .await
                .map_err(|_| {
                    log::error!(
                        "Completion API did not respond within {}s",
                        self.timeout.as_secs()
                    );
                    AppError::UpstreamUnavailable(format!(
                        "no response within {} seconds",
                        self.timeout.as_secs()
                    ))
                })?
                .map_err(|e| {
                    log::error!("Completion API error: {}", e);
                    AppError::UpstreamUnavailable(e.to_string())
                })?;

        response.into_content().ok_or_else(|| {
            log::error!("Empty response from completion API");
            AppError::UpstreamUnavailable("Empty response from AI".to_string())
        })
    }
}
