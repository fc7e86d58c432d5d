//! Core types for the verb and subject game.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Points awarded for a correctly identified subject.
pub const SUBJECT_REWARD: u32 = 10;

/// Authored sentence with its labeled subject and verb.
///
/// The bank on disk uses the French field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub phrase: String,
    #[serde(rename = "sujet", alias = "subject", default)]
    pub subject: String,
    #[serde(rename = "verbe", alias = "verb")]
    pub verb: String,
}

impl SentenceRecord {
    pub fn new(phrase: &str, subject: &str, verb: &str) -> Self {
        Self {
            phrase: phrase.to_string(),
            subject: subject.to_string(),
            verb: verb.to_string(),
        }
    }
}

/// Sentence split into tappable words with the expected answers located.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedSentence {
    pub phrase: String,
    pub words: Vec<String>,
    /// Empty when the subject is implicit (imperative mood).
    pub subject_indices: Vec<usize>,
    pub verb_indices: Vec<usize>,
}

impl TokenizedSentence {
    /// Expected indices for a stage.
    pub fn span(&self, stage: Stage) -> &[usize] {
        match stage {
            Stage::Verb => &self.verb_indices,
            Stage::Subject => &self.subject_indices,
        }
    }

    /// Whether every span index points into `words`.
    pub fn spans_in_bounds(&self) -> bool {
        let len = self.words.len();
        self.subject_indices
            .iter()
            .chain(self.verb_indices.iter())
            .all(|&i| i < len)
    }
}

/// One of the two questions asked per sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Verb,
    Subject,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verb => "verb",
            Self::Subject => "subject",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quiz state machine status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[serde(rename = "initial_loading")]
    LoadingInitial,
    Loading,
    AskingVerb,
    AskingSubject,
    FeedbackCorrect,
    FeedbackIncorrectVerb,
    FeedbackIncorrectSubject,
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::LoadingInitial
    }
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadingInitial => "initial_loading",
            Self::Loading => "loading",
            Self::AskingVerb => "asking_verb",
            Self::AskingSubject => "asking_subject",
            Self::FeedbackCorrect => "feedback_correct",
            Self::FeedbackIncorrectVerb => "feedback_incorrect_verb",
            Self::FeedbackIncorrectSubject => "feedback_incorrect_subject",
        }
    }

    /// Stage being asked, if the child can currently tap words.
    pub fn asking(&self) -> Option<Stage> {
        match self {
            Self::AskingVerb => Some(Stage::Verb),
            Self::AskingSubject => Some(Stage::Subject),
            _ => None,
        }
    }

    /// States from which a skip is accepted.
    pub fn can_skip(&self) -> bool {
        matches!(
            self,
            Self::AskingVerb
                | Self::AskingSubject
                | Self::FeedbackIncorrectVerb
                | Self::FeedbackIncorrectSubject
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::LoadingInitial | Self::Loading)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running counters shown in the statistics dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizStats {
    pub score: u32,
    pub verbs_found: u32,
    pub subjects_found: u32,
    pub verb_errors: u32,
    pub subject_errors: u32,
}

impl QuizStats {
    pub fn total_errors(&self) -> u32 {
        self.verb_errors + self.subject_errors
    }

    /// A sentence is complete once its subject is found.
    pub fn sentences_completed(&self) -> u32 {
        self.subjects_found
    }

    pub(crate) fn record(&mut self, stage: Stage, correct: bool) {
        match (stage, correct) {
            (Stage::Verb, true) => self.verbs_found += 1,
            (Stage::Verb, false) => self.verb_errors += 1,
            (Stage::Subject, true) => {
                self.subjects_found += 1;
                self.score += SUBJECT_REWARD;
            }
            (Stage::Subject, false) => self.subject_errors += 1,
        }
    }
}
