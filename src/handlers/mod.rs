pub mod health_handler;
pub mod quiz_handler;

use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::AppError;

pub use health_handler::health_check;
pub use quiz_handler::generate_quiz;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(generate_quiz)
        .default_service(web::to(not_found));
}

/// Reports body parse failures as `InvalidInput` rather than actix's plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::info!("Rejected request body: {}", err);
        AppError::InvalidInput(err.to_string()).into()
    })
}

async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    log::info!("404 hit for path: {}", req.path());
    Err(AppError::NotFound(req.path().to_string()))
}
