use std::{env, time::Duration};
use secrecy::SecretString;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://quiz-nova-zeta.vercel.app",
    "https://quiz-nova-eyh47gwct-yagnarashagans-projects-5a973c49.vercel.app",
    "http://localhost:3000",
];

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub completion_api_key: Option<SecretString>,
    pub completion_api_base: String,
    pub completion_model: String,
    pub completion_temperature: f32,
    pub completion_timeout_secs: u64,
    pub completion_referer: String,
    pub completion_title: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .or_else(|_| env::var("PORT"))
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            completion_api_key: env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            completion_api_base: env::var("COMPLETION_API_BASE")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
            completion_model: env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| "deepseek/deepseek-r1-0528-qwen3-8b:free".to_string()),
            completion_temperature: env::var("COMPLETION_TEMPERATURE")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(0.7),
            completion_timeout_secs: env::var("COMPLETION_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(120),
            completion_referer: env::var("COMPLETION_REFERER")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS[0].to_string()),
            completion_title: env::var("COMPLETION_TITLE")
                .unwrap_or_else(|_| "QuizNova".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|raw| parse_origins(&raw))
                .filter(|origins| !origins.is_empty())
                .unwrap_or_else(default_origins),
        }
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    /// Logs a warning when the service cannot reach the completion API.
    /// Requests still get a JSON error instead of a crash.
    pub fn warn_if_incomplete(&self) {
        if self.completion_api_key.is_none() {
            log::warn!(
                "OPENROUTER_API_KEY is not set; \
                 quiz generation requests will fail until it is configured"
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            completion_api_key: Some(SecretString::from("test_api_key".to_string())),
            completion_api_base: "http://127.0.0.1:9/api/v1".to_string(),
            completion_model: "test-model".to_string(),
            completion_temperature: 0.7,
            completion_timeout_secs: 5,
            completion_referer: "http://localhost:3000".to_string(),
            completion_title: "QuizNova".to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
}
