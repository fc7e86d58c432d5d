pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use petit_adam_core::SentenceBank;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::generator::{GeminiGenerator, SentenceGenerator};
use crate::services::sessions::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<SentenceBank>,
    pub sessions: Arc<SessionStore>,
    pub generator: Option<Arc<dyn SentenceGenerator>>,
}

impl AppState {
    pub fn new(config: &Config, bank: SentenceBank) -> Self {
        Self {
            bank: Arc::new(bank),
            sessions: Arc::new(SessionStore::new(config.timing, config.session_ttl)),
            generator: None,
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn SentenceGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Sentence routes
        .route("/api/sentences", get(routes::sentences::list))
        .route("/api/sentences/generate", post(routes::sentences::generate))
        .route("/api/tokenize", post(routes::sentences::tokenize_phrase))
        // Session routes
        .route("/api/sessions", post(routes::sessions::create))
        .route(
            "/api/sessions/:id",
            get(routes::sessions::get).delete(routes::sessions::delete),
        )
        .route("/api/sessions/:id/tap", post(routes::sessions::tap))
        .route("/api/sessions/:id/submit", post(routes::sessions::submit))
        .route("/api/sessions/:id/skip", post(routes::sessions::skip))
        .route("/api/sessions/:id/generate", post(routes::sessions::generate))
        .route("/api/sessions/:id/stats", get(routes::sessions::stats));

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let bank = services::bank::load_bank(&config.sentences_path).await;
    let mut state = AppState::new(&config, bank);

    match &config.gemini {
        Some(gemini) => {
            tracing::info!(model = %gemini.model, "sentence generation enabled");
            state = state.with_generator(Arc::new(GeminiGenerator::new(gemini)?));
        }
        None => tracing::info!("GEMINI_API_KEY not set, sentence generation disabled"),
    }

    let app = router(state);

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
