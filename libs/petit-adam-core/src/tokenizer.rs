//! Splits a French sentence into the words shown to the child.
//!
//! # Rules
//! - Whitespace separates words; trailing `. , ! ? ; :` stays on its word.
//! - Elided articles `l'`, `d'`, `s'` and `qu'` are joined to the following
//!   word when it starts with a letter: `l'` + `oiseau` gives `l'oiseau`.
//! - `n'` is only joined when the following word is an auxiliary form such
//!   as `est` or `ont`, so negations read `n'est pas`.
//! - Any other non-space character stands on its own (`!` in `Mange !`).

use regex::Regex;
use std::sync::LazyLock;

/// Leftmost alternative wins, so a lowercase elided prefix is split off
/// before the word pattern can swallow it.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ldsqjntm]'|(?:[\p{L}\p{N}-]['’]?)+[.,!?;:]*|\S")
        .expect("token pattern is a valid regex")
});

/// Punctuation that may trail a word.
pub const TRAILING_PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', ':'];

const ELIDED_PREFIXES: [&str; 4] = ["l'", "d'", "s'", "qu'"];

const NEGATION_PREFIX: &str = "n'";

/// Auxiliary forms that `n'` attaches to.
const AUXILIARY_FORMS: [&str; 17] = [
    "est", "ai", "as", "a", "avons", "avez", "ont", "étais", "était", "étions", "étiez",
    "étaient", "suis", "es", "sommes", "êtes", "sont",
];

/// Tokenize a phrase into words.
///
/// Never fails: an empty or blank phrase gives an empty list.
pub fn tokenize(phrase: &str) -> Vec<String> {
    let raw: Vec<&str> = TOKEN_PATTERN
        .find_iter(phrase)
        .map(|m| m.as_str())
        .collect();

    let mut words = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let current = raw[i];
        match raw.get(i + 1) {
            Some(next) if joins_with(current, next) => {
                words.push(format!("{current}{next}"));
                i += 2;
            }
            _ => {
                words.push(current.to_string());
                i += 1;
            }
        }
    }
    words
}

/// Strip trailing punctuation, lowercase and fold `’` to `'`, the form used
/// to compare words.
pub fn normalize_word(word: &str) -> String {
    word.trim_end_matches(TRAILING_PUNCTUATION)
        .to_lowercase()
        .replace('’', "'")
}

fn joins_with(prefix: &str, next: &str) -> bool {
    let prefix = normalize_word(prefix);
    if ELIDED_PREFIXES.contains(&prefix.as_str()) {
        return next.chars().next().is_some_and(char::is_alphabetic);
    }
    if prefix == NEGATION_PREFIX {
        return AUXILIARY_FORMS.contains(&normalize_word(next).as_str());
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn capitalized_elision_stays_one_word() {
        assert_eq!(
            tokenize("L'oiseau vole haut."),
            words(&["L'oiseau", "vole", "haut."])
        );
    }

    #[test]
    fn lowercase_elision_is_merged() {
        assert_eq!(
            tokenize("Je vois l'oiseau et d'autres amis."),
            words(&["Je", "vois", "l'oiseau", "et", "d'autres", "amis."])
        );
    }

    #[test]
    fn detached_prefix_is_merged() {
        assert_eq!(tokenize("L' abeille butine."), words(&["L'abeille", "butine."]));
        assert_eq!(tokenize("qu' il pleut"), words(&["qu'il", "pleut"]));
    }

    #[test]
    fn prefix_before_non_letter_is_not_merged() {
        assert_eq!(tokenize("l' 3 chats"), words(&["l'", "3", "chats"]));
    }

    #[test]
    fn negation_joins_auxiliary_only() {
        assert_eq!(
            tokenize("Ce n'est pas difficile."),
            words(&["Ce", "n'est", "pas", "difficile."])
        );
        assert_eq!(
            tokenize("Il n'aime pas ça."),
            words(&["Il", "n'", "aime", "pas", "ça."])
        );
    }

    #[test]
    fn other_elisions_stay_split() {
        assert_eq!(tokenize("j'aime"), words(&["j'", "aime"]));
        assert_eq!(tokenize("C'est beau"), words(&["C'est", "beau"]));
    }

    #[test]
    fn punctuation_attaches_to_previous_word() {
        assert_eq!(
            tokenize("Moi, je regarde la télé."),
            words(&["Moi,", "je", "regarde", "la", "télé."])
        );
        assert_eq!(tokenize("Vite!?"), words(&["Vite!?"]));
    }

    #[test]
    fn spaced_punctuation_is_its_own_word() {
        assert_eq!(
            tokenize("Chante une chanson !"),
            words(&["Chante", "une", "chanson", "!"])
        );
    }

    #[test]
    fn accents_and_hyphens() {
        assert_eq!(
            tokenize("Où est-ce que l'élève prépare aujourd'hui ?"),
            words(&["Où", "est-ce", "que", "l'élève", "prépare", "aujourd'hui", "?"])
        );
    }

    #[test]
    fn blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
    }

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_word("Haut.!"), "haut");
        assert_eq!(normalize_word("L'Oiseau,"), "l'oiseau");
        assert_eq!(normalize_word("L’Oiseau"), "l'oiseau");
    }

    #[test]
    fn typographic_apostrophe_prefix_is_merged() {
        assert_eq!(tokenize("L’ abeille butine."), words(&["L’abeille", "butine."]));
    }

    proptest! {
        #[test]
        fn tokenize_is_deterministic(phrase in "\\PC{0,60}") {
            prop_assert_eq!(tokenize(&phrase), tokenize(&phrase));
        }

        #[test]
        fn tokens_are_never_blank(phrase in "[a-zéèàç' .,!?]{0,60}") {
            for word in tokenize(&phrase) {
                prop_assert!(!word.trim().is_empty());
            }
        }

        #[test]
        fn retokenizing_joined_words_is_stable(phrase in "[A-Za-zéèê' .,!]{0,60}") {
            let once = tokenize(&phrase);
            let again = tokenize(&once.join(" "));
            prop_assert_eq!(tokenize(&again.join(" ")), again);
        }
    }
}
