//! Quiz session endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::generator::generate_sentence;
use crate::AppState;

/// POST /api/sessions
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Json<SessionView> {
    Json(state.sessions.create(&state.bank, request.seed).await)
}

/// GET /api/sessions/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>> {
    Ok(Json(state.sessions.view(id).await?))
}

/// POST /api/sessions/:id/tap
pub async fn tap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TapRequest>,
) -> Result<Json<SessionView>> {
    let (_, view) = state
        .sessions
        .update(id, |session| session.tap(request.index))
        .await?;
    Ok(Json(view))
}

/// POST /api/sessions/:id/submit
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>> {
    let (correct, session) = state.sessions.update(id, |session| session.submit()).await?;
    Ok(Json(SubmitResponse { correct, session }))
}

/// POST /api/sessions/:id/skip
pub async fn skip(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>> {
    let (_, view) = state.sessions.update(id, |session| session.skip()).await?;
    Ok(Json(view))
}

/// POST /api/sessions/:id/generate
///
/// Replaces the current sentence with a generated one.
pub async fn generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<SessionView>> {
    let generator = state.generator.as_deref().ok_or_else(|| {
        ApiError::Unavailable("sentence generation is not configured".to_string())
    })?;

    // Unknown sessions are rejected before calling the generator.
    state.sessions.view(id).await?;

    let sentence = generate_sentence(generator, request.topic.as_deref()).await;
    let (_, view) = state
        .sessions
        .update(id, |session| session.present(sentence.into()))
        .await?;
    Ok(Json(view))
}

/// GET /api/sessions/:id/stats
pub async fn stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatsResponse>> {
    let (stats, _) = state
        .sessions
        .update(id, |session| Ok(StatsResponse::from(session.stats())))
        .await?;
    Ok(Json(stats))
}

/// DELETE /api/sessions/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    state.sessions.remove(id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
