//! Locates a labeled phrase inside a tokenized sentence.

use crate::tokenizer::{normalize_word, tokenize};
use crate::types::{SentenceRecord, TokenizedSentence};

/// Find the indices of `needle` inside `words`.
///
/// Words are compared after stripping trailing punctuation and lowercasing.
/// The leftmost full match wins. A blank needle (implicit subject) or no
/// match gives an empty span.
pub fn find_span<S: AsRef<str>>(words: &[S], needle: &str) -> Vec<usize> {
    if needle.trim().is_empty() {
        return Vec::new();
    }

    let needle: Vec<String> = needle.split_whitespace().map(normalize_word).collect();
    if needle.len() > words.len() {
        return Vec::new();
    }

    let haystack: Vec<String> = words.iter().map(|w| normalize_word(w.as_ref())).collect();

    haystack
        .windows(needle.len())
        .position(|window| window == needle.as_slice())
        .map(|start| (start..start + needle.len()).collect())
        .unwrap_or_default()
}

/// Tokenize a record and locate its subject and verb.
pub fn locate(record: &SentenceRecord) -> TokenizedSentence {
    let words = tokenize(&record.phrase);
    let subject_indices = find_span(&words, &record.subject);
    let verb_indices = find_span(&words, &record.verb);

    TokenizedSentence {
        phrase: record.phrase.clone(),
        words,
        subject_indices,
        verb_indices,
    }
}

/// Normalized text covered by a span, words joined by single spaces.
pub fn span_text<S: AsRef<str>>(words: &[S], indices: &[usize]) -> String {
    indices
        .iter()
        .filter_map(|&i| words.get(i))
        .map(|w| normalize_word(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn finds_single_word() {
        let words = ["Ce", "n'", "est", "pas", "difficile."];
        assert_eq!(find_span(&words, "est"), vec![2]);
    }

    #[test]
    fn finds_multi_word_ignoring_case_and_punctuation() {
        let words = ["Le", "chien", "court", "vite."];
        assert_eq!(find_span(&words, "le Chien"), vec![0, 1]);
        assert_eq!(find_span(&words, "vite"), vec![3]);
        assert_eq!(find_span(&words, "court vite!"), vec![2, 3]);
    }

    #[test]
    fn blank_needle_is_empty() {
        let words = ["Regarde", "le", "ciel."];
        assert!(find_span(&words, "").is_empty());
        assert!(find_span(&words, "   ").is_empty());
    }

    #[test]
    fn needle_longer_than_sentence() {
        let words = ["Mange!"];
        assert!(find_span(&words, "Mange ta soupe").is_empty());
    }

    #[test]
    fn leftmost_occurrence_wins() {
        let words = ["Le", "chat", "voit", "le", "chat."];
        assert_eq!(find_span(&words, "le chat"), vec![0, 1]);
    }

    #[test]
    fn no_match() {
        let words = ["Le", "chien", "court."];
        assert!(find_span(&words, "chat").is_empty());
    }

    #[test]
    fn elided_label_matches_merged_token() {
        let record = SentenceRecord::new("Je vois l'oiseau.", "Je", "vois");
        let located = locate(&record);
        assert_eq!(find_span(&located.words, "l'oiseau"), vec![2]);
    }

    #[test]
    fn apostrophe_forms_match_each_other() {
        let words = ["L’oiseau", "vole", "haut."];
        assert_eq!(find_span(&words, "L'oiseau"), vec![0]);

        let words = ["Je", "vois", "l'abeille."];
        assert_eq!(find_span(&words, "l’abeille"), vec![2]);
    }

    #[test]
    fn locates_full_sentence() {
        let record = SentenceRecord::new("Le chien court vite.", "Le chien", "court");
        let located = locate(&record);
        assert_eq!(located.words, vec!["Le", "chien", "court", "vite."]);
        assert_eq!(located.subject_indices, vec![0, 1]);
        assert_eq!(located.verb_indices, vec![2]);
    }

    #[test]
    fn locates_negated_verb() {
        let record = SentenceRecord::new("Ce n'est pas difficile.", "Ce", "n'est pas");
        let located = locate(&record);
        assert_eq!(located.subject_indices, vec![0]);
        assert_eq!(located.verb_indices, vec![1, 2]);
    }

    #[test]
    fn imperative_has_no_subject() {
        let record = SentenceRecord::new("Regarde le ciel bleu.", "", "Regarde");
        let located = locate(&record);
        assert!(located.subject_indices.is_empty());
        assert_eq!(located.verb_indices, vec![0]);
    }

    #[test]
    fn span_text_reconstructs_label() {
        let words = ["L'abeille", "butine", "la", "fleur."];
        assert_eq!(span_text(&words, &[0]), "l'abeille");
        assert_eq!(span_text(&words, &[2, 3]), "la fleur");
    }

    proptest! {
        #[test]
        fn found_span_round_trips(
            words in prop::collection::vec("[a-zA-Zéè]{1,6}[.,!]?", 1..10),
            start in 0usize..10,
            len in 1usize..4,
        ) {
            prop_assume!(start < words.len());
            let end = (start + len).min(words.len());
            let needle = words[start..end].join(" ");

            let span = find_span(&words, &needle);
            prop_assert!(!span.is_empty());
            prop_assert!(span[0] <= start);
            prop_assert!(span.windows(2).all(|w| w[1] == w[0] + 1));
            prop_assert_eq!(span_text(&words, &span), span_text(&words, &(start..end).collect::<Vec<_>>()));
        }
    }
}
