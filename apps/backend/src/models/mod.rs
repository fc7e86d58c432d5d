//! API request and response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export shared types from petit-adam-core
pub use petit_adam_core::{
    BankSource, GameStatus, GeneratedSentence, QuizSession, QuizStats, SentenceRecord, SoundCue,
    Stage,
};

// === Sentences ===

/// GET /api/sentences response
#[derive(Debug, Serialize, Deserialize)]
pub struct SentencesResponse {
    pub source: BankSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub sentences: Vec<SentenceRecord>,
}

/// POST /api/tokenize request
#[derive(Debug, Deserialize)]
pub struct TokenizeRequest {
    pub phrase: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub verb: Option<String>,
}

/// POST /api/tokenize response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenizeResponse {
    pub words: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_indices: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verb_indices: Option<Vec<usize>>,
}

/// Optional topic for generated sentences
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: Option<String>,
}

// === Sessions ===

/// POST /api/sessions request
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Fixes the sentence order, mostly for tests and demos.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// POST /api/sessions/:id/tap request
#[derive(Debug, Deserialize)]
pub struct TapRequest {
    pub index: usize,
}

/// Expected answer shown after a correct submission
#[derive(Debug, Serialize, Deserialize)]
pub struct RevealedSpan {
    pub stage: Stage,
    pub indices: Vec<usize>,
}

/// Everything the presentation layer needs to draw a session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub status: GameStatus,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase: Option<String>,
    /// Hidden while a sentence is loading.
    pub words: Vec<String>,
    pub selection: Vec<usize>,
    pub can_submit: bool,
    pub can_skip: bool,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed: Option<RevealedSpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cue: Option<SoundCue>,
    /// Fireworks are shown while a correct answer is celebrated.
    pub celebrate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Milliseconds until the next automatic transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_transition_ms: Option<u64>,
}

impl SessionView {
    pub fn from_session(id: Uuid, session: &QuizSession, next_transition_ms: Option<u64>) -> Self {
        let status = session.status();
        let sentence = session.sentence();
        let words = match sentence {
            Some(s) if !status.is_loading() => s.words.clone(),
            _ => Vec::new(),
        };

        Self {
            id,
            status,
            prompt: session.prompt().to_string(),
            phrase: sentence
                .filter(|_| !status.is_loading())
                .map(|s| s.phrase.clone()),
            words,
            selection: session.selection(),
            can_submit: session.can_submit(),
            can_skip: status.can_skip() && session.bank().is_some(),
            score: session.score(),
            revealed: session.revealed_span().map(|(stage, indices)| RevealedSpan {
                stage,
                indices: indices.to_vec(),
            }),
            cue: session.current_cue(),
            celebrate: status == GameStatus::FeedbackCorrect,
            warning: session.warning().map(str::to_string),
            next_transition_ms,
        }
    }
}

/// GET /api/sessions/:id/stats response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub score: u32,
    pub verbs_found: u32,
    pub subjects_found: u32,
    pub verb_errors: u32,
    pub subject_errors: u32,
    pub total_errors: u32,
    pub sentences_completed: u32,
}

impl From<&QuizStats> for StatsResponse {
    fn from(stats: &QuizStats) -> Self {
        Self {
            score: stats.score,
            verbs_found: stats.verbs_found,
            subjects_found: stats.subjects_found,
            verb_errors: stats.verb_errors,
            subject_errors: stats.subject_errors,
            total_errors: stats.total_errors(),
            sentences_completed: stats.sentences_completed(),
        }
    }
}

/// POST /api/sessions/:id/submit response
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub correct: bool,
    pub session: SessionView,
}
