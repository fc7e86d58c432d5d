//! Sentences produced by an external text generator.
//!
//! The generator tokenizes and labels its own sentence, so its output
//! bypasses the tokenizer and span locator. Output that cannot be played
//! is replaced by fixed sentences with known-good indices.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::TokenizedSentence;

/// Generator output: a sentence with its words and labeled indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSentence {
    pub sentence: String,
    pub words: Vec<String>,
    #[serde(default)]
    pub verb_indices: Vec<usize>,
    #[serde(default)]
    pub subject_indices: Vec<usize>,
}

impl GeneratedSentence {
    fn fixed(sentence: &str, words: &[&str], subject: &[usize], verb: &[usize]) -> Self {
        Self {
            sentence: sentence.to_string(),
            words: words.iter().map(|w| w.to_string()).collect(),
            verb_indices: verb.to_vec(),
            subject_indices: subject.to_vec(),
        }
    }

    /// Sentence used when the generator returned unusable verb indices.
    pub fn last_resort() -> Self {
        Self::fixed("La fleur pousse.", &["La", "fleur", "pousse."], &[0, 1], &[2])
    }

    /// Sentences used when the generator returned nothing.
    pub fn fallbacks() -> Vec<Self> {
        vec![
            Self::fixed("Le soleil brille.", &["Le", "soleil", "brille."], &[0, 1], &[2]),
            Self::fixed("Le chat joue.", &["Le", "chat", "joue."], &[0, 1], &[2]),
            Self::fixed("L'oiseau chante.", &["L'", "oiseau", "chante."], &[0, 1], &[2]),
        ]
    }
}

impl From<GeneratedSentence> for TokenizedSentence {
    fn from(generated: GeneratedSentence) -> Self {
        let mut subject_indices = generated.subject_indices;
        let mut verb_indices = generated.verb_indices;
        subject_indices.sort_unstable();
        subject_indices.dedup();
        verb_indices.sort_unstable();
        verb_indices.dedup();

        TokenizedSentence {
            phrase: generated.sentence,
            words: generated.words,
            subject_indices,
            verb_indices,
        }
    }
}

/// Turn raw generator output into a playable sentence.
pub fn sanitize<R: Rng + ?Sized>(output: Option<GeneratedSentence>, rng: &mut R) -> GeneratedSentence {
    let Some(mut output) = output else {
        tracing::error!("sentence generator returned no output, using a fallback sentence");
        let fallbacks = GeneratedSentence::fallbacks();
        return fallbacks
            .choose(rng)
            .cloned()
            .unwrap_or_else(GeneratedSentence::last_resort);
    };

    let len = output.words.len();
    if output.verb_indices.is_empty() || output.verb_indices.iter().any(|&i| i >= len) {
        tracing::warn!(
            sentence = %output.sentence,
            verb_indices = ?output.verb_indices,
            "generated sentence has no usable verb indices, using fallback"
        );
        return GeneratedSentence::last_resort();
    }

    if output.subject_indices.iter().any(|&i| i >= len) {
        tracing::warn!(
            sentence = %output.sentence,
            subject_indices = ?output.subject_indices,
            "generated subject indices out of range, treating subject as implicit"
        );
        output.subject_indices.clear();
    }

    output
}
