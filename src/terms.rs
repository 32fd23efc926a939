// src/terms.rs
//! Term Set Loader: line-delimited phrase lists → stemmed, deduplicated token sequences.
//!
//! Files are plain text, one phrase per line. The list name is the file stem, and lists
//! live under a category directory:
//!
//! ```text
//! <root>/topics/politics.txt
//! <root>/evidence-language/numbers.txt
//! ```
//!
//! Once compiled, a [`TopicSet`] is immutable and can be shared by every worker.

use crate::error::TermError;
use crate::normalize::Normalizer;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A stemmed phrase: one or more stem tokens in order.
pub type Phrase = Vec<String>;

pub const TOPICS_CATEGORY: &str = "topics";
pub const EVIDENCE_CATEGORY: &str = "evidence-language";

/// Named list of unique phrases, sorted lexicographically by token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermList {
    pub name: String,
    pub phrases: Vec<Phrase>,
}

impl TermList {
    /// Build a list, enforcing the sort + dedup invariant.
    pub fn new(name: impl Into<String>, mut phrases: Vec<Phrase>) -> Self {
        phrases.sort();
        phrases.dedup();
        Self {
            name: name.into(),
            phrases,
        }
    }

    /// Convenience for tests and inline configs: each `&str` is stemmed as a phrase.
    pub fn from_phrases(name: impl Into<String>, raw: &[&str], normalizer: &Normalizer) -> Self {
        let phrases = raw
            .iter()
            .map(|p| normalizer.stem_phrase(p))
            .filter(|p| !p.is_empty())
            .collect();
        Self::new(name, phrases)
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Token count of the longest phrase (0 for an empty list).
    pub fn longest(&self) -> usize {
        self.phrases.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Parse newline-delimited phrases. Blank lines are skipped.
///
/// With `stem = false` each line is only split on whitespace.
pub fn load_terms(source: &str, stem: bool, normalizer: &Normalizer) -> Vec<Phrase> {
    let mut out: Vec<Phrase> = source
        .lines()
        .map(|line| {
            if stem {
                normalizer.stem_phrase(line)
            } else {
                line.split_whitespace().map(str::to_string).collect()
            }
        })
        .filter(|p| !p.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Read one term file. The list takes its name from the file stem.
pub fn load_terms_file(
    path: &Path,
    stem: bool,
    normalizer: &Normalizer,
) -> Result<TermList, TermError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| TermError::BadName(path.to_path_buf()))?
        .to_string();
    let content = fs::read_to_string(path).map_err(|source| TermError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let phrases = load_terms(&content, stem, normalizer);
    if phrases.is_empty() {
        // Not fatal here: the classifier reports it when the topic is used.
        warn!(path = %path.display(), "term list has no phrases");
    }
    debug!(list = %name, phrases = phrases.len(), "term list loaded");
    Ok(TermList { name, phrases })
}

/// Immutable mapping topic name → term list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicSet {
    lists: BTreeMap<String, TermList>,
}

impl TopicSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lists(lists: impl IntoIterator<Item = TermList>) -> Self {
        let mut set = Self::new();
        for l in lists {
            set.insert(l);
        }
        set
    }

    /// Insert or replace the list stored under its name.
    pub fn insert(&mut self, list: TermList) {
        self.lists.insert(list.name.clone(), list);
    }

    pub fn get(&self, name: &str) -> Option<&TermList> {
        self.lists.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TermList)> {
        self.lists.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// Path of a named list inside a category directory.
pub fn term_path(root: &Path, category: &str, name: &str) -> PathBuf {
    root.join(category).join(format!("{name}.txt"))
}

/// Load `<root>/<category>/<name>.txt` for every name (stemmed).
pub fn compile_topics<S: AsRef<str>>(
    root: &Path,
    category: &str,
    names: &[S],
    normalizer: &Normalizer,
) -> Result<TopicSet, TermError> {
    let mut set = TopicSet::new();
    for name in names {
        let path = term_path(root, category, name.as_ref());
        set.insert(load_terms_file(&path, true, normalizer)?);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(v: &[&str]) -> Phrase {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dedups_after_stemming_and_sorts() {
        let n = Normalizer::default();
        let out = load_terms("voters\nvoter\nmake america great again\n\n", true, &n);
        assert_eq!(
            out,
            vec![toks(&["make", "america", "great", "again"]), toks(&["voter"])]
        );
    }

    #[test]
    fn unstemmed_lines_are_split_only() {
        let n = Normalizer::default();
        let out = load_terms("Running fast\nrunning\nRunning fast", false, &n);
        assert_eq!(out, vec![toks(&["Running", "fast"]), toks(&["running"])]);
    }

    #[test]
    fn handles_crlf_and_whitespace_lines() {
        let n = Normalizer::identity();
        let out = load_terms("gun control\r\n   \r\nabortion\r\n", true, &n);
        assert_eq!(out, vec![toks(&["abortion"]), toks(&["gun", "control"])]);
    }

    #[test]
    fn term_list_longest_and_invariant() {
        let n = Normalizer::identity();
        let l = TermList::from_phrases("t", &["b", "a c d", "b", ""], &n);
        assert_eq!(l.len(), 2);
        assert_eq!(l.longest(), 3);
        assert_eq!(l.phrases[0], toks(&["a", "c", "d"]));
        assert_eq!(TermList::new("e", vec![]).longest(), 0);
    }

    #[test]
    fn topic_set_is_keyed_by_name() {
        let n = Normalizer::identity();
        let set = TopicSet::from_lists([
            TermList::from_phrases("race", &["ethnicity"], &n),
            TermList::from_phrases("gender", &["woman"], &n),
        ]);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["gender", "race"]);
        assert!(set.get("race").is_some());
        assert!(set.get("moral").is_none());
    }
}
