// src/ngram.rs
//! N-gram windows and exact-length phrase matching.

use crate::error::ClassifyError;
use crate::terms::{Phrase, TermList};
use std::collections::HashSet;

/// Consecutive `n`-token windows, in order. `len - n + 1` windows, none if `n == 0` or `n > len`.
pub fn generate_ngrams<T>(tokens: &[T], n: usize) -> Vec<&[T]> {
    if n == 0 {
        return Vec::new();
    }
    tokens.windows(n).collect()
}

/// Result of matching one term list against a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub found: bool,
    /// Every phrase that occurred, once each, in term-list order.
    pub matched: Vec<Phrase>,
}

/// Match `terms` against `tokens`.
///
/// For each window size `i` in `1..=longest`, the `i`-grams are collected and every phrase
/// of length `i` is looked up. Matching is exact-length.
pub fn match_terms(tokens: &[String], terms: &TermList) -> Result<MatchOutcome, ClassifyError> {
    if terms.is_empty() {
        return Err(ClassifyError::EmptyTermList {
            topic: terms.name.clone(),
        });
    }

    let longest = terms.longest();
    let mut hit = vec![false; terms.phrases.len()];

    for i in 1..=longest {
        let grams: HashSet<&[String]> = generate_ngrams(tokens, i).into_iter().collect();
        if grams.is_empty() {
            // no window of this size or longer exists
            break;
        }
        for (k, phrase) in terms.phrases.iter().enumerate() {
            if phrase.len() == i && grams.contains(phrase.as_slice()) {
                hit[k] = true;
            }
        }
    }

    let matched: Vec<Phrase> = terms
        .phrases
        .iter()
        .zip(hit)
        .filter_map(|(p, h)| h.then(|| p.clone()))
        .collect();

    Ok(MatchOutcome {
        found: !matched.is_empty(),
        matched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn unigrams_and_bigrams() {
        let t = s(&["i", "am", "happy"]);
        let one = generate_ngrams(&t, 1);
        assert_eq!(one.len(), 3);
        assert_eq!(one[2], &t[2..3]);
        let two = generate_ngrams(&t, 2);
        assert_eq!(two, vec![&t[0..2], &t[1..3]]);
    }

    #[test]
    fn oversized_and_zero_windows_are_empty() {
        let t = s(&["a", "b"]);
        assert!(generate_ngrams(&t, 3).is_empty());
        assert!(generate_ngrams(&t, 0).is_empty());
        assert!(generate_ngrams::<String>(&[], 1).is_empty());
    }

    #[test]
    fn matches_every_phrase_not_just_first() {
        let n = Normalizer::identity();
        let terms = TermList::from_phrases("politics", &["gun control", "senate", "vote"], &n);
        let out = match_terms(&s(&["the", "senate", "debated", "gun", "control"]), &terms).unwrap();
        assert!(out.found);
        assert_eq!(out.matched, vec![s(&["gun", "control"]), s(&["senate"])]);
    }

    #[test]
    fn exact_length_only() {
        let n = Normalizer::identity();
        let terms = TermList::from_phrases("t", &["gun control act"], &n);
        let out = match_terms(&s(&["gun", "control"]), &terms).unwrap();
        assert!(!out.found);
        assert!(out.matched.is_empty());
    }

    #[test]
    fn empty_term_list_is_an_error() {
        let err = match_terms(&s(&["x"]), &TermList::new("moral", vec![])).unwrap_err();
        assert_eq!(
            err,
            ClassifyError::EmptyTermList {
                topic: "moral".into()
            }
        );
    }

    #[test]
    fn empty_document_matches_nothing() {
        let n = Normalizer::identity();
        let terms = TermList::from_phrases("t", &["a"], &n);
        let out = match_terms(&[], &terms).unwrap();
        assert_eq!(out, MatchOutcome::default());
    }
}
