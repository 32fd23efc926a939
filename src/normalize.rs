// src/normalize.rs
//! Text normalization: lowercase, punctuation stripping, whitespace tokenization and stemming.
//!
//! Two views of a document exist on purpose:
//! - [`Normalizer::normalize`] sorts and deduplicates the stems (historical behavior, loses order),
//! - [`Normalizer::tokens`] keeps order and duplicates so multi-token phrases can match.
//!
//! Term-list phrases go through [`Normalizer::stem_phrase`], which never reorders.

use rust_stemmers::{Algorithm, Stemmer as SnowballImpl};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Fixed ASCII punctuation set (not locale-aware).
pub const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Single-operation stemming capability, injected into the [`Normalizer`].
pub trait Stemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// English Snowball stemmer (the production default).
pub struct SnowballStemmer {
    inner: SnowballImpl,
}

impl SnowballStemmer {
    pub fn english() -> Self {
        Self {
            inner: SnowballImpl::create(Algorithm::English),
        }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowballStemmer")
            .field("algorithm", &"english")
            .finish()
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, token: &str) -> String {
        self.inner.stem(token).into_owned()
    }
}

/// Returns tokens unchanged. Handy for deterministic tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStemmer;

impl Stemmer for IdentityStemmer {
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Which token view the classifier matches against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Sorted, deduplicated stems. Multi-token phrases rarely survive the resort.
    #[default]
    Legacy,
    /// Stems in document order, duplicates kept.
    Ordered,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(MatchMode::Legacy),
            "ordered" => Ok(MatchMode::Ordered),
            other => Err(format!("unknown match mode `{other}` (expected legacy|ordered)")),
        }
    }
}

/// Shared normalizer. Cloning is cheap (the stemmer sits behind an `Arc`).
#[derive(Clone)]
pub struct Normalizer {
    stemmer: Arc<dyn Stemmer>,
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer").finish_non_exhaustive()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(SnowballStemmer::english())
    }
}

impl Normalizer {
    pub fn new<S: Stemmer + 'static>(stemmer: S) -> Self {
        Self {
            stemmer: Arc::new(stemmer),
        }
    }

    pub fn identity() -> Self {
        Self::new(IdentityStemmer)
    }

    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token)
    }

    /// Stems in document order, duplicates kept.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        strip_punctuation(&text.to_lowercase())
            .split_whitespace()
            .map(|w| self.stemmer.stem(w))
            .collect()
    }

    /// Sorted, unique stems. Token order is NOT preserved.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let mut toks = self.tokens(text);
        toks.sort();
        toks.dedup();
        toks
    }

    /// Token view for the given match mode.
    pub fn prepare(&self, text: &str, mode: MatchMode) -> Vec<String> {
        match mode {
            MatchMode::Legacy => self.normalize(text),
            MatchMode::Ordered => self.tokens(text),
        }
    }

    /// Stem a term-list phrase token by token, keeping order. Punctuation is stripped the
    /// same way as for documents; words left empty are dropped.
    pub fn stem_phrase(&self, phrase: &str) -> Vec<String> {
        phrase
            .split_whitespace()
            .map(|w| strip_punctuation(&w.to_lowercase()))
            .filter(|w| !w.is_empty())
            .map(|w| self.stemmer.stem(&w))
            .collect()
    }
}

/// Remove every character of [`PUNCTUATION`].
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !PUNCTUATION.contains(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fixed_punctuation_only() {
        assert_eq!(strip_punctuation("don't stop, (ok)!"), "dont stop ok");
        // non-ASCII punctuation is not part of the set
        assert_eq!(strip_punctuation("a–b"), "a–b");
    }

    #[test]
    fn normalize_sorts_and_dedups() {
        let n = Normalizer::identity();
        assert_eq!(
            n.normalize("Gun control, gun RIGHTS."),
            vec!["control", "gun", "rights"]
        );
    }

    #[test]
    fn tokens_keep_order_and_duplicates() {
        let n = Normalizer::identity();
        assert_eq!(
            n.tokens("Gun control, gun RIGHTS."),
            vec!["gun", "control", "gun", "rights"]
        );
    }

    #[test]
    fn snowball_stems_documents_and_phrases_alike() {
        let n = Normalizer::default();
        assert_eq!(n.tokens("Running runners"), vec!["run", "runner"]);
        assert_eq!(n.stem_phrase("Running Runners"), vec!["run", "runner"]);
    }

    #[test]
    fn stem_phrase_keeps_order_and_repeats() {
        let n = Normalizer::identity();
        assert_eq!(
            n.stem_phrase("make america great again"),
            vec!["make", "america", "great", "again"]
        );
        assert_eq!(n.stem_phrase("very very"), vec!["very", "very"]);
        assert!(n.stem_phrase("   ").is_empty());
    }

    #[test]
    fn stem_phrase_strips_punctuation_like_documents() {
        let n = Normalizer::identity();
        assert_eq!(n.stem_phrase("Pro-Choice"), vec!["prochoice"]);
        assert_eq!(n.stem_phrase("the u.s. - today"), vec!["the", "us", "today"]);
        assert_eq!(n.stem_phrase("don't"), n.tokens("Don't"));
    }

    #[test]
    fn match_mode_parses() {
        assert_eq!("Ordered".parse::<MatchMode>(), Ok(MatchMode::Ordered));
        assert_eq!(" legacy ".parse::<MatchMode>(), Ok(MatchMode::Legacy));
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }
}
