use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        completion_client::{CompletionClient, OpenAiCompletionClient},
        quiz_service::QuizService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        config.warn_if_incomplete();

        let completion_client = Arc::new(OpenAiCompletionClient::new(&config));
        Self::with_completion_client(config, completion_client)
    }

    /// Builds the state around any completion backend.
    pub fn with_completion_client(
        config: Config,
        completion_client: Arc<dyn CompletionClient>,
    ) -> Self {
        let quiz_service = Arc::new(QuizService::new(completion_client));

        Self {
            quiz_service,
            config: Arc::new(config),
        }
    }
}
