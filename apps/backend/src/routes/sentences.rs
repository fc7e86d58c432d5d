//! Sentence bank, tokenizer and generation endpoints

use axum::{extract::State, Json};
use petit_adam_core::{find_span, tokenize};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::generator::generate_sentence;
use crate::AppState;

/// GET /api/sentences
pub async fn list(State(state): State<AppState>) -> Json<SentencesResponse> {
    Json(SentencesResponse {
        source: state.bank.source(),
        warning: state.bank.warning().map(str::to_string),
        sentences: state.bank.records().to_vec(),
    })
}

/// POST /api/tokenize
pub async fn tokenize_phrase(Json(request): Json<TokenizeRequest>) -> Json<TokenizeResponse> {
    let words = tokenize(&request.phrase);
    let subject_indices = request.subject.as_deref().map(|s| find_span(&words, s));
    let verb_indices = request.verb.as_deref().map(|v| find_span(&words, v));

    Json(TokenizeResponse {
        words,
        subject_indices,
        verb_indices,
    })
}

/// POST /api/sentences/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GeneratedSentence>> {
    let generator = state.generator.as_deref().ok_or_else(|| {
        ApiError::Unavailable("sentence generation is not configured".to_string())
    })?;

    let sentence = generate_sentence(generator, request.topic.as_deref()).await;
    Ok(Json(sentence))
}
