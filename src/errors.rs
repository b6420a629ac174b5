use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::services::normalizer::NormalizeError;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Completion API unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error(transparent)]
    Normalization(#[from] NormalizeError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Short category written to the `error` field of the response body.
    fn category(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "Invalid input",
            AppError::UpstreamUnavailable(_) | AppError::Normalization(_) => {
                "Failed to generate quiz"
            }
            AppError::NotFound(_) => "Not Found",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Normalization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.category().to_string(),
            message: self.to_string(),
            code: self.status_code().as_u16(),
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
