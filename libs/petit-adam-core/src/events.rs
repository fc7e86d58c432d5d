//! Notifications emitted by the quiz state machine.
//!
//! Sounds, fireworks and other embellishments listen to these events; they
//! never drive the game themselves.

use serde::{Deserialize, Serialize};

use crate::bank::BankSource;
use crate::types::{GameStatus, Stage};

/// Something that happened during a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    BankLoaded {
        source: BankSource,
        sentences: usize,
    },
    StatusChanged {
        from: GameStatus,
        to: GameStatus,
    },
    SentenceReady {
        phrase: String,
        words: usize,
    },
    AnswerChecked {
        stage: Stage,
        correct: bool,
    },
    ScoreChanged {
        score: u32,
        gained: u32,
    },
    Skipped {
        status: GameStatus,
    },
}

impl QuizEvent {
    /// Sound the presentation layer plays for this event, if any.
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            Self::AnswerChecked { correct: false, .. } => Some(SoundCue::Error),
            Self::AnswerChecked {
                stage: Stage::Verb,
                correct: true,
            } => Some(SoundCue::GoodAnswer),
            Self::AnswerChecked {
                stage: Stage::Subject,
                correct: true,
            } => Some(SoundCue::CashRegister),
            _ => None,
        }
    }
}

/// Sound effects known to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    GoodAnswer,
    CashRegister,
    Error,
}

impl SoundCue {
    /// Asset path relative to the site root.
    pub fn asset_path(&self) -> &'static str {
        match self {
            Self::GoodAnswer => "/sounds/good-answer.mp3",
            Self::CashRegister => "/sounds/cash-register.mp3",
            Self::Error => "/sounds/error-sound.mp3",
        }
    }
}

/// Listener notified synchronously of every quiz event.
pub trait QuizObserver: Send + Sync {
    fn on_event(&mut self, event: &QuizEvent);
}

/// Observer that writes events to the tracing log.
#[derive(Debug, Default)]
pub struct TracingObserver {
    session: String,
}

impl TracingObserver {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
        }
    }
}

impl QuizObserver for TracingObserver {
    fn on_event(&mut self, event: &QuizEvent) {
        match event {
            QuizEvent::AnswerChecked { stage, correct } => {
                tracing::info!(session = %self.session, %stage, correct, "answer checked");
            }
            QuizEvent::BankLoaded { source, sentences } => {
                tracing::info!(session = %self.session, ?source, sentences, "sentence bank ready");
            }
            other => tracing::debug!(session = %self.session, event = ?other, "quiz event"),
        }
    }
}
