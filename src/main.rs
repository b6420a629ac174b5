use actix_web::{web, App, HttpServer};
use env_logger::Env;

use quiznova_server::{
    app_state::AppState,
    config::Config,
    handlers,
    middleware::{access_logger, build_cors, RequestIdMiddleware},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let state = AppState::new(config.clone());

    log::info!(
        "QuizNova backend starting on {}:{} (model {})",
        config.web_server_host,
        config.web_server_port,
        config.completion_model
    );
    log::info!("Allowed CORS origins: {}", config.allowed_origins.join(", "));

    let allowed_origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(handlers::json_config())
            .wrap(RequestIdMiddleware)
            .wrap(build_cors(&allowed_origins))
            .wrap(access_logger())
            .configure(handlers::configure)
    })
    .bind((config.web_server_host.as_str(), config.web_server_port))?
    .run()
    .await
}
