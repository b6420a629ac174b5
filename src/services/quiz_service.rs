use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::dto::{request::GenerateQuizRequestDto, response::GenerateQuizResponse},
    services::{
        completion_client::CompletionClient, normalizer::normalize_completion,
        prompt_builder::build_quiz_prompt,
    },
};

/// Generates a quiz per request. Holds no per-request state.
pub struct QuizService {
    completion_client: Arc<dyn CompletionClient>,
}

impl QuizService {
    pub fn new(completion_client: Arc<dyn CompletionClient>) -> Self {
        Self { completion_client }
    }

    pub async fn generate_quiz(
        &self,
        request: GenerateQuizRequestDto,
    ) -> AppResult<GenerateQuizResponse> {
        let request = request.into_quiz_request().inspect_err(|e| {
            log::info!("Rejected quiz request: {}", e);
        })?;

        log::info!(
            "Generating {} questions on topic '{}' (difficulty: {})",
            request.count,
            request.topic,
            request
                .difficulty
                .map(|d| d.to_string())
                .unwrap_or_else(|| "any".to_string())
        );

        let prompt = build_quiz_prompt(&request);
        let raw = self.completion_client.complete(&prompt).await?;

        let questions = normalize_completion(&raw, request.count).map_err(|e| {
            log::error!("Quiz normalization failed: {}", e);
            log::debug!("Raw completion content: {}", raw);
            AppError::from(e)
        })?;

        log::info!("Successfully generated {} questions", questions.len());
        Ok(GenerateQuizResponse { questions })
    }
}
