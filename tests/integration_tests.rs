use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use actix_web::{http::StatusCode, test, web, App, HttpResponse, HttpServer};
use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{json, Value};

use quiznova_server::{
    app_state::AppState,
    config::Config,
    errors::AppResult,
    handlers,
    middleware::{access_logger, build_cors, RequestIdMiddleware},
    services::{completion_client::CompletionClient, prompt_builder::QuizPrompt},
};

/// Replies with a fixed completion and remembers the prompts it was sent.
struct CannedCompletion {
    reply: String,
    prompts: Mutex<Vec<QuizPrompt>>,
}

impl CannedCompletion {
    fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for CannedCompletion {
    async fn complete(&self, prompt: &QuizPrompt) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.clone());
        Ok(self.reply.clone())
    }
}

fn config(api_key: Option<&str>) -> Config {
    Config {
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 0,
        completion_api_key: api_key.map(|k| SecretString::from(k.to_string())),
        completion_api_base: "http://127.0.0.1:9/api/v1".to_string(),
        completion_model: "integration-model".to_string(),
        completion_temperature: 0.7,
        completion_timeout_secs: 2,
        completion_referer: "http://localhost:3000".to_string(),
        completion_title: "QuizNova".to_string(),
        allowed_origins: vec!["http://localhost:3000".to_string()],
    }
}

/// Five ocean questions wrapped in a code fence, with answers given as
/// letters and with missing or malformed option prefixes.
fn oceans_reply() -> String {
    let questions = json!([
        {
            "text": "Which is the largest ocean?",
            "options": ["Atlantic", "Pacific", "Indian", "Arctic"],
            "correctAnswer": "B"
        },
        {
            "text": "Which ocean surrounds Antarctica?",
            "options": ["A) Southern", "B) Indian", "C) Atlantic", "D) Arctic"],
            "correctAnswer": "A) Southern"
        },
        {
            "text": "What is the deepest point in the ocean?",
            "options": [
                "(A) Puerto Rico Trench",
                "(B) Java Trench",
                "(C) Mariana Trench",
                "(D) Tonga Trench"
            ],
            "correctAnswer": "c"
        },
        {
            "text": "Which ocean is the smallest?",
            "options": ["A) Indian", "B) Southern", "C) Atlantic", "D) Arctic"],
            "correctAnswer": "D)"
        },
        {
            "text": "Roughly how much of Earth's surface is ocean?",
            "options": ["A) 51%", "B) 61%", "C) 71%", "D) 81%"],
            "correctAnswer": "C) 71%"
        }
    ]);
    format!("Here is your quiz:\n```json\n{}\n```", questions)
}

/// Serves `body` with `status` for every request after `delay`, on a local
/// port. Returns the API base URL and the hit counter.
async fn spawn_completion_api(
    status: StatusCode,
    body: &'static str,
    delay: Duration,
) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let server = HttpServer::new(move || {
        let counter = counter.clone();
        App::new().default_service(web::to(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                actix_web::rt::time::sleep(delay).await;
                HttpResponse::build(status).body(body)
            }
        }))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    (format!("http://{}/api/v1", addr), hits)
}

fn config_for(api_base: &str, timeout_secs: u64) -> Config {
    let mut config = config(Some("key"));
    config.completion_api_base = api_base.to_string();
    config.completion_timeout_secs = timeout_secs;
    config
}

macro_rules! quiz_app {
    ($state:expr) => {{
        let state = $state;
        let origins = state.config.allowed_origins.clone();
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(handlers::json_config())
                .wrap(RequestIdMiddleware)
                .wrap(build_cors(&origins))
                .wrap(access_logger())
                .configure(handlers::configure),
        )
        .await
    }};
}

#[actix_web::test]
async fn generates_a_normalised_quiz_end_to_end() {
    let completion = CannedCompletion::new(oceans_reply());
    let app = quiz_app!(AppState::with_completion_client(
        config(Some("key")),
        completion.clone()
    ));

    let req = test::TestRequest::post()
        .uri("/api/generate-quiz")
        .insert_header(("Origin", "http://localhost:3000"))
        .set_json(json!({ "topic": "  Oceans  ", "count": 5, "difficulty": "easy" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );

    let body: Value = test::read_body_json(resp).await;
    let questions = body["questions"].as_array().expect("questions array");
    assert_eq!(questions.len(), 5);

    for question in questions {
        let options: Vec<&str> = question["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_str().unwrap())
            .collect();
        for (option, letter) in options.iter().zip(["A) ", "B) ", "C) ", "D) "]) {
            assert!(option.starts_with(letter), "option {:?}", option);
        }
        let answer = question["correctAnswer"].as_str().unwrap();
        assert!(options.contains(&answer), "answer {:?} not in {:?}", answer, options);
    }

    assert_eq!(questions[0]["correctAnswer"], "B) Pacific");
    assert_eq!(questions[2]["correctAnswer"], "C) Mariana Trench");
    assert_eq!(questions[3]["correctAnswer"], "D) Arctic");

    assert_eq!(completion.calls(), 1);
    let prompt = completion.prompts.lock().unwrap()[0].clone();
    assert!(prompt.user.contains("Generate exactly 5"));
    assert!(prompt.user.contains("\"Oceans\""));
    assert!(prompt.user.contains("easy"));
}

#[actix_web::test]
async fn numeric_string_count_is_accepted() {
    let completion = CannedCompletion::new(oceans_reply());
    let app = quiz_app!(AppState::with_completion_client(config(Some("key")), completion));

    let req = test::TestRequest::post()
        .uri("/api/generate-quiz")
        .set_json(json!({ "topic": "Oceans", "count": "5" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn invalid_requests_are_rejected_before_the_model_is_called() {
    let completion = CannedCompletion::new(oceans_reply());
    let app = quiz_app!(AppState::with_completion_client(
        config(Some("key")),
        completion.clone()
    ));

    for payload in [
        json!({ "topic": "", "count": 5 }),
        json!({ "topic": "Oceans", "count": 2 }),
        json!({ "topic": "Oceans", "count": 11 }),
        json!({ "topic": "Oceans" }),
        json!({ "topic": "Oceans", "count": 5, "difficulty": "impossible" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/generate-quiz")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {}", payload);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid input", "payload {}", payload);
    }

    assert_eq!(completion.calls(), 0);
}

#[actix_web::test]
async fn wrong_question_count_from_the_model_is_a_generation_failure() {
    let completion = CannedCompletion::new(oceans_reply());
    let app = quiz_app!(AppState::with_completion_client(config(Some("key")), completion));

    let req = test::TestRequest::post()
        .uri("/api/generate-quiz")
        .set_json(json!({ "topic": "Oceans", "count": 7 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to generate quiz");
    assert!(body["message"].as_str().is_some());
}

#[actix_web::test]
async fn missing_api_key_reports_a_generation_failure() {
    let app = quiz_app!(AppState::new(config(None)));

    let req = test::TestRequest::post()
        .uri("/api/generate-quiz")
        .set_json(json!({ "topic": "Oceans", "count": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to generate quiz");
}

#[actix_web::test]
async fn upstream_server_error_surfaces_after_a_single_attempt() {
    let (api_base, hits) = spawn_completion_api(
        StatusCode::SERVICE_UNAVAILABLE,
        "provider overloaded",
        Duration::ZERO,
    )
    .await;
    let app = quiz_app!(AppState::new(config_for(&api_base, 5)));

    let req = test::TestRequest::post()
        .uri("/api/generate-quiz")
        .set_json(json!({ "topic": "Oceans", "count": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to generate quiz");
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.contains("provider overloaded")),
        "body {}",
        body
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn stalled_upstream_hits_the_completion_timeout() {
    let (api_base, hits) =
        spawn_completion_api(StatusCode::OK, "{}", Duration::from_secs(3)).await;
    let app = quiz_app!(AppState::new(config_for(&api_base, 1)));

    let req = test::TestRequest::post()
        .uri("/api/generate-quiz")
        .set_json(json!({ "topic": "Oceans", "count": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to generate quiz");
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.contains("within 1 seconds")),
        "body {}",
        body
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn health_and_unknown_routes() {
    let app = quiz_app!(AppState::new(config(None)));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/health").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/nothing-here").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not Found");
}
