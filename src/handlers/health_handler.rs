use actix_web::{get, HttpResponse};

use crate::models::dto::response::HealthResponse;

#[get("/api/health")]
async fn health_check() -> HttpResponse {
    log::debug!("Health check endpoint hit");
    HttpResponse::Ok().json(HealthResponse::ok())
}
