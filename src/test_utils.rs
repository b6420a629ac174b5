use crate::models::domain::QuizQuestion;

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// One question object as a model might emit it.
    pub fn question_json(text: &str, options: &[&str], correct_answer: &str) -> String {
        serde_json::json!({
            "text": text,
            "options": options,
            "correctAnswer": correct_answer,
        })
        .to_string()
    }

    /// A well-formed completion body holding `count` questions.
    pub fn completion_json(count: usize) -> String {
        let questions: Vec<String> = sample_questions(count)
            .iter()
            .map(|q| {
                let options: Vec<&str> = q.options.iter().map(String::as_str).collect();
                question_json(&q.text, &options, &q.correct_answer)
            })
            .collect();
        format!("[{}]", questions.join(","))
    }

    /// Validated questions whose correct answer is always option B.
    pub fn sample_questions(count: usize) -> Vec<QuizQuestion> {
        (1..=count)
            .map(|n| QuizQuestion {
                text: format!("Question {} about the topic?", n),
                options: [
                    format!("A) First answer {}", n),
                    format!("B) Second answer {}", n),
                    format!("C) Third answer {}", n),
                    format!("D) Fourth answer {}", n),
                ],
                correct_answer: format!("B) Second answer {}", n),
            })
            .collect()
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

/// A chat-completion endpoint on a local port that answers every request
/// with one canned reply, counting hits and keeping the request headers.
#[cfg(test)]
pub mod completion_stub {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
        time::Duration,
    };

    use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};

    pub struct CompletionStub {
        pub base_url: String,
        hits: Arc<AtomicUsize>,
        headers: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl CompletionStub {
        pub fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }

        pub fn header(&self, name: &str) -> Option<String> {
            self.headers
                .lock()
                .unwrap()
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.clone())
        }
    }

    pub async fn spawn(status: StatusCode, body: &'static str, delay: Duration) -> CompletionStub {
        let hits = Arc::new(AtomicUsize::new(0));
        let headers = Arc::new(Mutex::new(Vec::new()));

        let server = {
            let hits = hits.clone();
            let headers = headers.clone();
            HttpServer::new(move || {
                let hits = hits.clone();
                let headers = headers.clone();
                App::new().default_service(web::to(move |req: HttpRequest| {
                    let hits = hits.clone();
                    let headers = headers.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        *headers.lock().unwrap() = req
                            .headers()
                            .iter()
                            .map(|(k, v)| {
                                (k.to_string(), v.to_str().unwrap_or_default().to_string())
                            })
                            .collect();
                        actix_web::rt::time::sleep(delay).await;
                        HttpResponse::build(status)
                            .content_type("application/json")
                            .body(body)
                    }
                }))
            })
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("stub should bind to a local port")
        };

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        CompletionStub {
            base_url: format!("http://{}/api/v1", addr),
            hits,
            headers,
        }
    }

    pub const CHAT_REPLY: &str =
        r#"{"id":"stub","choices":[{"index":0,"message":{"role":"assistant","content":"[1]"}}]}"#;
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::services::normalizer::normalize_completion;

    #[test]
    fn test_fixtures_completion_matches_sample_questions() {
        let parsed = normalize_completion(&completion_json(4), 4).unwrap();
        assert_eq!(parsed, sample_questions(4));
    }

    #[test]
    fn test_fixtures_sample_questions_are_valid() {
        let questions = sample_questions(3);
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| q.correct_index() == Some(1)));
    }
}
