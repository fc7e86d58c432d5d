//! Error types for petit-adam-core.

use thiserror::Error;

use crate::types::GameStatus;

/// Result type alias using QuizError.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors raised while reading a sentence bank.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("invalid sentence bank: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sentence bank is empty")]
    Empty,

    #[error("could not read sentence bank: {0}")]
    Unavailable(String),
}

/// Events the quiz state machine refuses in its current state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("no answer is expected while {status}")]
    NotInteractive { status: GameStatus },

    #[error("word {index} is out of range (sentence has {len} words)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("select at least one word before submitting")]
    EmptySelection,

    #[error("cannot skip while {status}")]
    CannotSkip { status: GameStatus },

    #[error("sentences are not loaded yet")]
    NotLoaded,

    #[error("sentence has answer indices outside its {len} words")]
    InvalidSentence { len: usize },
}
