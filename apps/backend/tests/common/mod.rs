//! Shared setup for the API integration tests.
//!
//! Sessions run on a one-sentence bank so every test knows which words to
//! tap. With zero delays each timed transition fires on the next request.

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use petit_adam_backend::config::Config;
use petit_adam_backend::services::generator::SentenceGenerator;
use petit_adam_backend::{router, AppState};
use petit_adam_core::{QuizTiming, SentenceBank};
use serde_json::{json, Value};

pub struct TestContext {
    pub server: TestServer,
}

impl TestContext {
    /// Zero delays, no generator.
    pub fn new() -> Self {
        Self::build(zero_timing(), None)
    }

    /// Zero delays with a stub generator.
    pub fn with_generator() -> Self {
        Self::build(zero_timing(), Some(fixtures::StubGenerator::shared()))
    }

    /// Custom pacing, for tests that need to observe a transient state.
    pub fn with_timing(timing: QuizTiming) -> Self {
        Self::build(timing, None)
    }

    fn build(
        timing: QuizTiming,
        generator: Option<Arc<dyn SentenceGenerator>>,
    ) -> Self {
        let config = Config {
            timing,
            ..Config::default()
        };
        let bank = SentenceBank::new(vec![fixtures::dog_record()]).unwrap();
        let mut state = AppState::new(&config, bank);
        if let Some(generator) = generator {
            state = state.with_generator(generator);
        }
        let server = TestServer::new(router(state)).unwrap();
        Self { server }
    }

    /// Create a session and return its id.
    pub async fn create_session(&self) -> String {
        let response = self.server.post("/api/sessions").json(&json!({})).await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn view(&self, id: &str) -> Value {
        let response = self.server.get(&format!("/api/sessions/{}", id)).await;
        response.assert_status_ok();
        response.json()
    }

    pub async fn tap(&self, id: &str, index: usize) -> Value {
        let response = self
            .server
            .post(&format!("/api/sessions/{}/tap", id))
            .json(&json!({ "index": index }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    pub async fn submit(&self, id: &str) -> Value {
        let response = self
            .server
            .post(&format!("/api/sessions/{}/submit", id))
            .await;
        response.assert_status_ok();
        response.json()
    }
}

fn zero_timing() -> QuizTiming {
    QuizTiming {
        loading_delay: Duration::ZERO,
        feedback_delay: Duration::ZERO,
    }
}
