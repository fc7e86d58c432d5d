//! Loading the sentence bank from disk.

use std::path::Path;

use petit_adam_core::{BankError, SentenceBank};

/// Read the JSON bank at `path`, falling back to the built-in sentences.
pub async fn load_bank(path: &Path) -> SentenceBank {
    tracing::info!(path = %path.display(), "loading sentence bank");
    let loaded = match tokio::fs::read_to_string(path).await {
        Ok(json) => SentenceBank::from_json(&json),
        Err(err) => Err(BankError::Unavailable(format!(
            "{}: {}",
            path.display(),
            err
        ))),
    };

    let bank = SentenceBank::load_or_fallback(loaded);
    tracing::info!(sentences = bank.len(), source = ?bank.source(), "sentence bank ready");
    bank
}

#[cfg(test)]
mod tests {
    use super::*;
    use petit_adam_core::{locate, normalize_word, span_text, BankSource};

    fn normalized_label(label: &str) -> String {
        label
            .split_whitespace()
            .map(normalize_word)
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[tokio::test]
    async fn missing_file_uses_fallback() {
        let bank = load_bank(Path::new("/nonexistent/sentences.json")).await;
        assert_eq!(bank.source(), BankSource::Fallback);
        assert!(bank.warning().unwrap().contains("/nonexistent/sentences.json"));
    }

    #[tokio::test]
    async fn bundled_bank_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sentences.json");
        let bank = load_bank(&path).await;
        assert_eq!(bank.source(), BankSource::Loaded);
        assert!(bank.len() >= 10);
        for record in bank.records() {
            let sentence = locate(record);
            assert!(!sentence.verb_indices.is_empty(), "{}", record.phrase);
            assert_eq!(
                span_text(&sentence.words, &sentence.verb_indices),
                normalized_label(&record.verb),
                "{}",
                record.phrase
            );
            assert_eq!(
                span_text(&sentence.words, &sentence.subject_indices),
                normalized_label(&record.subject),
                "{}",
                record.phrase
            );
        }
    }
}
