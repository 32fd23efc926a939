// src/classify.rs
//! Lexical classifier: runs the n-gram matcher for every topic of a [`TopicSet`].
//!
//! The text is normalized once and shared across topics. Results are keyed by topic name,
//! so the outcome does not depend on iteration order.
//!
//! Topics whose name contains `number` also match on raw digits (any Unicode numeric
//! character, so `٣` counts as well as `3`): each distinct digit is appended to the matched terms as a one-token phrase.

use crate::error::ClassifyError;
use crate::ngram::match_terms;
use crate::normalize::{MatchMode, Normalizer};
use crate::terms::{Phrase, TopicSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Topic names containing this marker also match on digits.
pub const NUMBER_TOPIC_MARKER: &str = "number";

/// Outcome for one (document, topic) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub matched: bool,
    #[serde(default)]
    pub terms: Vec<Phrase>,
}

/// topic name → result
pub type Classification = BTreeMap<String, ClassificationResult>;

// Short, stable id for log lines. Never log raw text.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Distinct numeric characters in order of first occurrence.
fn digits_in(text: &str) -> Vec<char> {
    let mut out = Vec::new();
    for c in text.chars().filter(|c| c.is_numeric()) {
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    normalizer: Normalizer,
    mode: MatchMode,
}

impl Classifier {
    pub fn new(normalizer: Normalizer, mode: MatchMode) -> Self {
        Self { normalizer, mode }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Classify `text` against every topic. An empty term list is a configuration error.
    pub fn classify(&self, text: &str, topics: &TopicSet) -> Result<Classification, ClassifyError> {
        let tokens = self.normalizer.prepare(text, self.mode);
        let digits = digits_in(text);

        let mut out = Classification::new();
        for (name, list) in topics.iter() {
            let outcome = match_terms(&tokens, list)?;
            let mut result = ClassificationResult {
                matched: outcome.found,
                terms: outcome.matched,
            };

            if name.contains(NUMBER_TOPIC_MARKER) && !digits.is_empty() {
                for d in &digits {
                    let phrase = vec![d.to_string()];
                    if !result.terms.contains(&phrase) {
                        result.terms.push(phrase);
                    }
                }
                result.matched = true;
            }

            out.insert(name.to_string(), result);
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            let hits: Vec<&str> = out
                .iter()
                .filter(|(_, r)| r.matched)
                .map(|(k, _)| k.as_str())
                .collect();
            debug!(id = %anon_hash(text), tokens = tokens.len(), ?hits, "classified");
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::TermList;

    fn topics(n: &Normalizer) -> TopicSet {
        TopicSet::from_lists([
            TermList::from_phrases("politics", &["senate", "gun control"], n),
            TermList::from_phrases("religion", &["church", "god"], n),
        ])
    }

    #[test]
    fn classifies_every_topic() {
        let n = Normalizer::default();
        let c = Classifier::new(n.clone(), MatchMode::Legacy);
        let out = c.classify("The Senate met in a church.", &topics(&n)).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out["politics"].matched);
        assert_eq!(out["politics"].terms, vec![vec!["senat".to_string()]]);
        assert!(out["religion"].matched);
    }

    #[test]
    fn legacy_mode_loses_multi_token_phrases() {
        let n = Normalizer::identity();
        let set = TopicSet::from_lists([TermList::from_phrases("politics", &["gun control"], &n)]);
        let text = "we need gun control now";

        let legacy = Classifier::new(n.clone(), MatchMode::Legacy);
        assert!(!legacy.classify(text, &set).unwrap()["politics"].matched);

        let ordered = Classifier::new(n, MatchMode::Ordered);
        let r = &ordered.classify(text, &set).unwrap()["politics"];
        assert!(r.matched);
        assert_eq!(r.terms, vec![vec!["gun".to_string(), "control".to_string()]]);
    }

    #[test]
    fn number_topics_match_digits() {
        let n = Normalizer::identity();
        let set = TopicSet::from_lists([
            TermList::from_phrases("numbers_evidence", &["percent"], &n),
            TermList::from_phrases("values", &["percent"], &n),
        ]);
        let c = Classifier::new(n, MatchMode::Legacy);
        let out = c.classify("there are 3 reasons, 33 in total and 1 more", &set).unwrap();
        let r = &out["numbers_evidence"];
        assert!(r.matched);
        assert_eq!(r.terms, vec![vec!["3".to_string()], vec!["1".to_string()]]);
        assert!(!out["values"].matched);
    }

    #[test]
    fn number_topics_match_non_ascii_digits() {
        let n = Normalizer::identity();
        let set = TopicSet::from_lists([TermList::from_phrases("numbers", &["percent"], &n)]);
        let c = Classifier::new(n, MatchMode::Legacy);
        let out = c.classify("٣ reasons", &set).unwrap();
        assert!(out["numbers"].matched);
        assert_eq!(out["numbers"].terms, vec![vec!["٣".to_string()]]);
        assert!(!c.classify("three reasons", &set).unwrap()["numbers"].matched);
    }

    #[test]
    fn phrases_with_punctuation_match_documents() {
        let n = Normalizer::identity();
        let phrases = crate::terms::load_terms("pro-choice\nu.s.\n", true, &n);
        let set = TopicSet::from_lists([TermList::new("politics", phrases)]);
        let text = "I am pro-choice and live in the U.S.";
        for mode in [MatchMode::Legacy, MatchMode::Ordered] {
            let c = Classifier::new(n.clone(), mode);
            let r = &c.classify(text, &set).unwrap()["politics"];
            assert!(r.matched, "{mode:?}");
            assert_eq!(r.terms.len(), 2, "{mode:?}");
        }
    }

    #[test]
    fn number_digit_already_matched_is_not_duplicated() {
        let n = Normalizer::identity();
        let set = TopicSet::from_lists([TermList::from_phrases("numbers", &["7"], &n)]);
        let c = Classifier::new(n, MatchMode::Legacy);
        let out = c.classify("lucky 7", &set).unwrap();
        assert_eq!(out["numbers"].terms, vec![vec!["7".to_string()]]);
    }

    #[test]
    fn empty_topic_is_surfaced() {
        let n = Normalizer::identity();
        let set = TopicSet::from_lists([
            TermList::from_phrases("ok", &["a"], &n),
            TermList::new("broken", vec![]),
        ]);
        let c = Classifier::new(n, MatchMode::Legacy);
        assert_eq!(
            c.classify("a b", &set).unwrap_err(),
            ClassifyError::EmptyTermList {
                topic: "broken".into()
            }
        );
    }

    #[test]
    fn anon_hash_is_short_and_stable() {
        assert_eq!(anon_hash("abc").len(), 12);
        assert_eq!(anon_hash("abc"), anon_hash("abc"));
        assert_ne!(anon_hash("abc"), anon_hash("abd"));
    }
}
