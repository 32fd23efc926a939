// src/analyze.rs
//! Analysis pipeline entry: annotates each discussion in place.
//!
//! Order per discussion:
//! 1) topic classification of `title + " " + selftext` (skipped for removed posts)
//! 2) evidence classification of every comment that is not removed
//! 3) optional link extraction
//! 4) delta attribution
//!
//! Discussions are independent; a batch runs one discussion per rayon task. A broken
//! parent chain only affects step 4 and is reported, not raised. An empty term list is a
//! configuration error and fails the call.

use crate::classify::Classifier;
use crate::delta::{attribute_deltas, count_confirmations, AttributionSummary, DeltaRules};
use crate::discussion::{Comment, ParentRef, Post};
use crate::error::{AnalysisError, AttributionError};
use crate::links::LinkExtractor;
use crate::terms::TopicSet;
use crate::tree::DiscussionTree;
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info, warn};

/// Outcome of the delta pass for one discussion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributionStatus {
    Complete(AttributionSummary),
    Aborted(AttributionError),
}

impl AttributionStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, AttributionStatus::Complete(_))
    }

    pub fn awarded(&self) -> usize {
        match self {
            AttributionStatus::Complete(s) => s.awarded,
            AttributionStatus::Aborted(_) => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionReport {
    pub post: String,
    pub topic_classified: bool,
    pub comments: usize,
    pub classified_comments: usize,
    pub removed_comments: usize,
    /// Comments replying directly to the post.
    pub top_level_comments: usize,
    /// Comments whose parent comment is not in the collection.
    pub orphaned_comments: usize,
    pub max_depth: usize,
    /// Confirmations seen, whether or not each award could be credited.
    pub total_deltas: usize,
    pub attribution: AttributionStatus,
}

#[derive(Default)]
struct ThreadShape {
    top_level: usize,
    orphaned: usize,
    max_depth: usize,
}

fn thread_shape(comments: &[Comment]) -> ThreadShape {
    let tree = DiscussionTree::new(comments);
    let mut shape = ThreadShape::default();
    for i in tree.roots() {
        match comments[i].parent() {
            ParentRef::Post(_) => shape.top_level += 1,
            ParentRef::Comment(_) | ParentRef::Other(_) => shape.orphaned += 1,
        }
    }
    shape.max_depth = (0..tree.len()).map(|i| tree.depth(i)).max().unwrap_or(0);
    shape
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub discussions: Vec<DiscussionReport>,
}

impl BatchReport {
    pub fn total_awarded(&self) -> usize {
        self.discussions.iter().map(|d| d.attribution.awarded()).sum()
    }

    pub fn aborted(&self) -> usize {
        self.discussions
            .iter()
            .filter(|d| !d.attribution.is_complete())
            .count()
    }
}

pub struct Analyzer {
    classifier: Classifier,
    topics: TopicSet,
    evidence: TopicSet,
    delta_rules: DeltaRules,
    links: Option<Box<dyn LinkExtractor>>,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("mode", &self.classifier.mode())
            .field("topics", &self.topics.names().collect::<Vec<_>>())
            .field("evidence", &self.evidence.names().collect::<Vec<_>>())
            .field("delta_rules", &self.delta_rules)
            .field("links", &self.links.is_some())
            .finish()
    }
}

impl Analyzer {
    pub fn new(classifier: Classifier, topics: TopicSet, evidence: TopicSet) -> Self {
        Self {
            classifier,
            topics,
            evidence,
            delta_rules: DeltaRules::default(),
            links: None,
        }
    }

    pub fn with_delta_rules(mut self, rules: DeltaRules) -> Self {
        self.delta_rules = rules;
        self
    }

    pub fn with_link_extractor<L: LinkExtractor + 'static>(mut self, links: L) -> Self {
        self.links = Some(Box::new(links));
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Annotate one discussion in place.
    pub fn annotate_post(&self, post: &mut Post) -> Result<DiscussionReport, AnalysisError> {
        let label = post.label().to_string();

        let topic_classified = if post.is_removed() {
            debug!(post = %label, "post removed; topic classification skipped");
            post.topic = None;
            false
        } else {
            let topic = self
                .classifier
                .classify(&post.classification_text(), &self.topics)
                .map_err(|e| AnalysisError::classify(format!("post {label}"), e))?;
            post.topic = Some(topic);
            true
        };

        let mut classified_comments = 0usize;
        let mut removed_comments = 0usize;
        for comment in post.comments.iter_mut() {
            if comment.is_removed() {
                comment.evidence_use = None;
                removed_comments += 1;
                continue;
            }
            let evidence = self
                .classifier
                .classify(&comment.body, &self.evidence)
                .map_err(|e| AnalysisError::classify(format!("comment {}", comment.name), e))?;
            comment.evidence_use = Some(evidence);
            classified_comments += 1;

            if let Some(extractor) = &self.links {
                let links = extractor.extract(comment);
                comment.links = Some(links);
            }
        }

        let shape = thread_shape(&post.comments);
        if shape.orphaned > 0 {
            debug!(post = %label, orphaned = shape.orphaned, "comments with purged parents");
        }

        let total_deltas = count_confirmations(&post.comments, &self.delta_rules);
        post.total_deltas = Some(total_deltas);

        let attribution = match attribute_deltas(&mut post.comments, &self.delta_rules) {
            Ok(summary) => AttributionStatus::Complete(summary),
            Err(e) => {
                warn!(post = %label, error = %e, "delta attribution aborted");
                AttributionStatus::Aborted(e)
            }
        };

        info!(
            post = %label,
            comments = post.comments.len(),
            classified_comments,
            removed_comments,
            orphaned = shape.orphaned,
            total_deltas,
            deltas = attribution.awarded(),
            attribution_complete = attribution.is_complete(),
            "discussion annotated"
        );

        Ok(DiscussionReport {
            post: label,
            topic_classified,
            comments: post.comments.len(),
            classified_comments,
            removed_comments,
            top_level_comments: shape.top_level,
            orphaned_comments: shape.orphaned,
            max_depth: shape.max_depth,
            total_deltas,
            attribution,
        })
    }

    /// Annotate every discussion, one rayon task per discussion. Report order follows `posts`.
    pub fn annotate_batch(&self, posts: &mut [Post]) -> Result<BatchReport, AnalysisError> {
        let discussions = posts
            .par_iter_mut()
            .map(|p| self.annotate_post(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BatchReport { discussions })
    }
}
