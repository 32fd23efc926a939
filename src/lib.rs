// src/lib.rs
//! ChangeMyView discussion analysis.
//!
//! Takes flat, API-sourced discussions (a post plus comments with `parent_id` references)
//! and annotates them with:
//! - topic classification of the post and evidence-language classification of comments
//!   (stemmed, variable-length phrase matching against term lists),
//! - delta awards credited to the right ancestor comment.
//!
//! ```text
//! term files ──▶ terms ──▶ TopicSet ─┐
//!                                    ▼
//! batch JSON ──▶ discussion ──▶ analyze ──▶ classify (normalize + ngram)
//!                                    │
//!                                    └────▶ delta (tree) ──▶ annotated JSON
//! ```

pub mod analyze;
pub mod classify;
pub mod config;
pub mod delta;
pub mod discussion;
pub mod error;
pub mod links;
pub mod ngram;
pub mod normalize;
pub mod store;
pub mod terms;
pub mod tree;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{Analyzer, AttributionStatus, BatchReport, DiscussionReport};
pub use crate::classify::{Classification, ClassificationResult, Classifier};
pub use crate::delta::{attribute_deltas, AttributionPolicy, DeltaRecord, DeltaRules};
pub use crate::discussion::{Comment, Post};
pub use crate::error::{AnalysisError, AttributionError, ClassifyError, TermError};
pub use crate::normalize::{MatchMode, Normalizer, Stemmer};
pub use crate::terms::{TermList, TopicSet};
