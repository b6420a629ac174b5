use actix_web::{post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState, errors::AppError, middleware::get_request_id,
    models::dto::request::GenerateQuizRequestDto,
};

#[post("/api/generate-quiz")]
async fn generate_quiz(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<GenerateQuizRequestDto>,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req).unwrap_or_default();
    log::info!("[{}] Quiz generation request received", request_id);

    let response = state
        .quiz_service
        .generate_quiz(request.into_inner())
        .await
        .inspect_err(|e| log::warn!("[{}] Quiz generation failed: {}", request_id, e))?;

    log::info!(
        "[{}] Returning {} questions",
        request_id,
        response.questions.len()
    );
    Ok(HttpResponse::Ok().json(response))
}
