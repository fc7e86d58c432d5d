//! Core library for the Petit Adam verb and subject game.
//!
//! Provides:
//! - Tokenizer for French sentences (elision and punctuation aware)
//! - Span locator matching labeled subjects and verbs to word indices
//! - Sentence bank with built-in fallback sentences
//! - Sanitizer for externally generated sentences
//! - Quiz state machine with observer events

pub mod bank;
pub mod error;
pub mod events;
pub mod generated;
pub mod quiz;
pub mod span;
pub mod tokenizer;
pub mod types;

pub use bank::{BankSource, SentenceBank};
pub use error::{BankError, QuizError, Result};
pub use events::{QuizEvent, QuizObserver, SoundCue, TracingObserver};
pub use generated::{sanitize, GeneratedSentence};
pub use quiz::{QuizSession, QuizTiming, Timer, TimerKind};
pub use span::{find_span, locate, span_text};
pub use tokenizer::{normalize_word, tokenize};
pub use types::{GameStatus, QuizStats, SentenceRecord, Stage, TokenizedSentence, SUBJECT_REWARD};
