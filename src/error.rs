//! Error types for the analysis core.
//!
//! Expected-absent data (removed comments, parents purged by the platform) is not an
//! error; it is skipped where it occurs. The enums here cover configuration problems
//! and structural breaks that callers must see.

use std::path::PathBuf;
use thiserror::Error;

/// Loading term lists from disk.
#[derive(Error, Debug)]
pub enum TermError {
    #[error("failed to read term list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("term list path has no usable file name: {0}")]
    BadName(PathBuf),
}

/// Classification misconfiguration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// A declared topic has no phrases; the longest phrase length is undefined.
    #[error("term list `{topic}` is empty")]
    EmptyTermList { topic: String },
}

/// Structural break while walking from a confirmation comment to the awarded comment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributionError {
    #[error("confirmation `{confirmation}` has no resolvable parent (parent_id `{parent_id}`)")]
    MissingSignalParent {
        confirmation: String,
        parent_id: String,
    },

    #[error("award signal `{signal}` has no resolvable parent (parent_id `{parent_id}`)")]
    MissingAwardedParent { signal: String, parent_id: String },
}

/// Pipeline-level failures.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("classification failed for {context}: {source}")]
    Classify {
        context: String,
        #[source]
        source: ClassifyError,
    },
}

impl AnalysisError {
    pub(crate) fn classify(context: impl Into<String>, source: ClassifyError) -> Self {
        AnalysisError::Classify {
            context: context.into(),
            source,
        }
    }
}
