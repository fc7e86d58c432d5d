//! Sentence bank loading and selection.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::BankError;
use crate::span::locate;
use crate::types::{SentenceRecord, TokenizedSentence};

/// Where the bank's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankSource {
    Loaded,
    Fallback,
}

/// Sentences the game draws from.
#[derive(Debug, Clone)]
pub struct SentenceBank {
    records: Vec<SentenceRecord>,
    source: BankSource,
    /// Message shown to the player when the fallback replaced the bank.
    warning: Option<String>,
}

impl SentenceBank {
    /// Build a bank from records; an empty list is an error.
    pub fn new(records: Vec<SentenceRecord>) -> Result<Self, BankError> {
        if records.is_empty() {
            return Err(BankError::Empty);
        }
        Ok(Self {
            records,
            source: BankSource::Loaded,
            warning: None,
        })
    }

    /// Parse a JSON array of `{phrase, sujet, verbe}` records.
    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let records: Vec<SentenceRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Built-in sentences used when nothing else is available.
    pub fn fallback() -> Self {
        Self {
            records: fallback_records(),
            source: BankSource::Fallback,
            warning: None,
        }
    }

    /// Keep a loaded bank, or substitute the fallback with a player-facing warning.
    pub fn load_or_fallback(loaded: Result<Self, BankError>) -> Self {
        match loaded {
            Ok(bank) => bank,
            Err(BankError::Empty) => {
                tracing::warn!("sentence bank is empty, using fallback sentences");
                Self {
                    warning: Some(
                        "Aucune phrase n'a pu être chargée. Utilisation des phrases de secours."
                            .to_string(),
                    ),
                    ..Self::fallback()
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load sentence bank, using fallback sentences");
                Self {
                    warning: Some(format!(
                        "Erreur de chargement des phrases : {}. Utilisation des phrases de secours.",
                        err
                    )),
                    ..Self::fallback()
                }
            }
        }
    }

    pub fn records(&self) -> &[SentenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> BankSource {
        self.source
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Pick a random record index, avoiding `last` when there is a choice.
    pub fn pick_index<R: Rng + ?Sized>(&self, rng: &mut R, last: Option<usize>) -> usize {
        let candidates: Vec<usize> = (0..self.records.len())
            .filter(|&i| self.records.len() <= 1 || Some(i) != last)
            .collect();
        candidates.choose(rng).copied().unwrap_or(0)
    }

    /// Tokenize the record at `index`, replacing it when its verb cannot be located.
    pub fn prepare<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> TokenizedSentence {
        match self.records.get(index) {
            Some(record) => prepare_record(record, rng),
            None => random_fallback(rng),
        }
    }
}

/// Tokenize a record; a sentence whose verb, or authored subject, cannot be
/// located cannot be played.
pub fn prepare_record<R: Rng + ?Sized>(record: &SentenceRecord, rng: &mut R) -> TokenizedSentence {
    let sentence = locate(record);
    if sentence.verb_indices.is_empty() {
        tracing::warn!(
            phrase = %record.phrase,
            verb = %record.verb,
            "verb not found in sentence, using a fallback sentence"
        );
        return random_fallback(rng);
    }
    if sentence.subject_indices.is_empty() && !record.subject.trim().is_empty() {
        tracing::warn!(
            phrase = %record.phrase,
            subject = %record.subject,
            "subject not found in sentence, using a fallback sentence"
        );
        return random_fallback(rng);
    }
    sentence
}

fn random_fallback<R: Rng + ?Sized>(rng: &mut R) -> TokenizedSentence {
    let records = fallback_records();
    let record = records.choose(rng).unwrap_or(&records[0]);
    locate(record)
}

fn fallback_records() -> Vec<SentenceRecord> {
    vec![
        SentenceRecord::new("Le chien court vite.", "Le chien", "court"),
        SentenceRecord::new("Elle dessine un chat.", "Elle", "dessine"),
        SentenceRecord::new("L'oiseau vole haut.", "L'oiseau", "vole"),
        SentenceRecord::new("Le soleil brille fort.", "Le soleil", "brille"),
        SentenceRecord::new("Maman prépare le repas.", "Maman", "prépare"),
        SentenceRecord::new("L'abeille butine la fleur.", "L'abeille", "butine"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::span_text;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BANK_JSON: &str = r#"[
        {"phrase": "Le chat dort.", "sujet": "Le chat", "verbe": "dort"},
        {"phrase": "Nous aimons lire.", "sujet": "Nous", "verbe": "aimons lire"},
        {"phrase": "Mange ta soupe !", "sujet": "", "verbe": "Mange"}
    ]"#;

    #[test]
    fn parses_bank() {
        let bank = SentenceBank::from_json(BANK_JSON).unwrap();
        assert_eq!(bank.len(), 3);
        assert_eq!(bank.source(), BankSource::Loaded);
        assert_eq!(bank.warning(), None);
        assert_eq!(bank.records()[1].verb, "aimons lire");
    }

    #[test]
    fn empty_bank_is_rejected() {
        assert!(matches!(SentenceBank::from_json("[]"), Err(BankError::Empty)));
    }

    #[test]
    fn malformed_bank_is_rejected() {
        assert!(matches!(
            SentenceBank::from_json("{\"phrase\": 1}"),
            Err(BankError::Json(_))
        ));
    }

    #[test]
    fn fallback_on_error_carries_warning() {
        let bank = SentenceBank::load_or_fallback(Err(BankError::Unavailable(
            "HTTP 404".to_string(),
        )));
        assert_eq!(bank.source(), BankSource::Fallback);
        assert_eq!(bank.len(), 6);
        assert!(bank.warning().unwrap().contains("HTTP 404"));
    }

    #[test]
    fn fallback_on_empty_carries_warning() {
        let bank = SentenceBank::load_or_fallback(SentenceBank::from_json("[]"));
        assert_eq!(bank.source(), BankSource::Fallback);
        assert!(bank.warning().unwrap().starts_with("Aucune phrase"));
    }

    #[test]
    fn every_fallback_sentence_is_playable() {
        let mut rng = StdRng::seed_from_u64(7);
        let bank = SentenceBank::fallback();
        for (i, record) in bank.records().iter().enumerate() {
            let sentence = bank.prepare(i, &mut rng);
            assert_eq!(sentence.phrase, record.phrase);
            assert_eq!(
                span_text(&sentence.words, &sentence.verb_indices),
                record.verb.to_lowercase()
            );
            assert_eq!(
                span_text(&sentence.words, &sentence.subject_indices),
                record.subject.to_lowercase()
            );
        }
    }

    #[test]
    fn never_repeats_last_index() {
        let mut rng = StdRng::seed_from_u64(42);
        let bank = SentenceBank::from_json(BANK_JSON).unwrap();
        let mut last = None;
        for _ in 0..50 {
            let next = bank.pick_index(&mut rng, last);
            assert!(next < bank.len());
            assert_ne!(Some(next), last);
            last = Some(next);
        }
    }

    #[test]
    fn single_record_bank_repeats() {
        let mut rng = StdRng::seed_from_u64(1);
        let bank = SentenceBank::new(vec![SentenceRecord::new("Il pleut.", "Il", "pleut")]).unwrap();
        assert_eq!(bank.pick_index(&mut rng, Some(0)), 0);
    }

    #[test]
    fn unlocatable_verb_is_replaced() {
        let mut rng = StdRng::seed_from_u64(3);
        let record = SentenceRecord::new("Le chat dort.", "Le chat", "mange");
        let sentence = prepare_record(&record, &mut rng);
        assert_ne!(sentence.phrase, record.phrase);
        assert!(!sentence.verb_indices.is_empty());
    }

    #[test]
    fn unlocatable_subject_is_replaced() {
        let mut rng = StdRng::seed_from_u64(3);
        let record = SentenceRecord::new("Le chat dort.", "Le chien", "dort");
        let sentence = prepare_record(&record, &mut rng);
        assert_ne!(sentence.phrase, record.phrase);
        assert!(!sentence.subject_indices.is_empty());
        assert!(!sentence.verb_indices.is_empty());
    }

    #[test]
    fn typographic_apostrophe_locates_subject() {
        let mut rng = StdRng::seed_from_u64(3);
        let record = SentenceRecord::new("L’oiseau vole haut.", "L'oiseau", "vole");
        let sentence = prepare_record(&record, &mut rng);
        assert_eq!(sentence.phrase, record.phrase);
        assert_eq!(sentence.subject_indices, vec![0]);
        assert_eq!(sentence.verb_indices, vec![1]);
    }

    #[test]
    fn implicit_subject_is_kept() {
        let mut rng = StdRng::seed_from_u64(3);
        let bank = SentenceBank::from_json(BANK_JSON).unwrap();
        let sentence = bank.prepare(2, &mut rng);
        assert_eq!(sentence.phrase, "Mange ta soupe !");
        assert!(sentence.subject_indices.is_empty());
        assert_eq!(sentence.verb_indices, vec![0]);
    }
}
