// src/delta.rs
//! Delta Attribution Engine.
//!
//! DeltaBot confirms each award with a reply to the user who typed the award signal:
//!
//! ```text
//! D  (credited comment)
//! └── S  (award signal, e.g. "!delta because ...")
//!     └── C  (DeltaBot: "Confirmed: 1 delta awarded to /u/...")
//! ```
//!
//! For each confirmation `C` the engine walks two parents up and credits `D`, recording
//! `S.author -> S.body` as provenance (last write wins per awarder).
//!
//! Awards are staged and applied only when the pass completes. Under
//! [`AttributionPolicy::AbortDiscussion`] one broken chain aborts the pass and every
//! comment keeps its zero record; [`AttributionPolicy::SkipAward`] drops only the
//! affected award.

use crate::classify::anon_hash;
use crate::discussion::Comment;
use crate::error::AttributionError;
use crate::tree::DiscussionTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const DEFAULT_BOT_AUTHOR: &str = "DeltaBot";
pub const DEFAULT_CONFIRMATION_MARKER: &str = "confirmed: 1 delta awarded to";

/// Per-comment award tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaRecord {
    pub count: u32,
    /// awarding user → justification they gave
    #[serde(default)]
    pub from: BTreeMap<String, String>,
}

impl DeltaRecord {
    fn award(&mut self, awarder: &str, justification: &str) {
        self.count += 1;
        self.from.insert(awarder.to_string(), justification.to_string());
    }
}

/// What a broken parent chain does to the rest of the discussion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionPolicy {
    /// Abort the whole pass (historical behavior).
    #[default]
    AbortDiscussion,
    /// Drop the affected award and keep going.
    SkipAward,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeltaRules {
    pub bot_author: String,
    /// Matched case-insensitively as a substring of the bot's comment.
    pub marker: String,
    pub policy: AttributionPolicy,
}

impl Default for DeltaRules {
    fn default() -> Self {
        Self {
            bot_author: DEFAULT_BOT_AUTHOR.to_string(),
            marker: DEFAULT_CONFIRMATION_MARKER.to_string(),
            policy: AttributionPolicy::default(),
        }
    }
}

impl DeltaRules {
    pub fn with_policy(mut self, policy: AttributionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bot-authored comment carrying the confirmation marker.
    pub fn is_confirmation(&self, comment: &Comment) -> bool {
        comment.author.as_deref() == Some(self.bot_author.as_str())
            && comment
                .body
                .to_lowercase()
                .contains(&self.marker.to_lowercase())
    }
}

/// Totals of one successful pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributionSummary {
    pub confirmations: usize,
    pub awarded: usize,
    /// Awards dropped because the signal or credited comment was removed.
    pub skipped_removed: usize,
    /// Broken chains tolerated under [`AttributionPolicy::SkipAward`].
    pub skipped: Vec<AttributionError>,
}

/// Number of delta confirmations in a discussion.
pub fn count_confirmations(comments: &[Comment], rules: &DeltaRules) -> usize {
    comments.iter().filter(|c| rules.is_confirmation(c)).count()
}

struct StagedAward {
    target: usize,
    awarder: String,
    justification: String,
}

/// Reset every record, then credit each confirmed award to the confirmation's grandparent.
pub fn attribute_deltas(
    comments: &mut [Comment],
    rules: &DeltaRules,
) -> Result<AttributionSummary, AttributionError> {
    for c in comments.iter_mut() {
        c.delta = DeltaRecord::default();
    }

    let (staged, summary) = {
        let tree = DiscussionTree::new(comments);
        plan_awards(&tree, rules)?
    };

    for award in staged {
        comments[award.target]
            .delta
            .award(&award.awarder, &award.justification);
    }

    Ok(summary)
}

fn plan_awards(
    tree: &DiscussionTree<'_>,
    rules: &DeltaRules,
) -> Result<(Vec<StagedAward>, AttributionSummary), AttributionError> {
    let comments = tree.comments();
    let mut staged = Vec::new();
    let mut summary = AttributionSummary::default();

    for (ci, confirmation) in comments.iter().enumerate() {
        if !rules.is_confirmation(confirmation) {
            continue;
        }
        summary.confirmations += 1;

        let chain = resolve_chain(tree, ci);
        let (si, di) = match chain {
            Ok(pair) => pair,
            Err(e) => match rules.policy {
                AttributionPolicy::AbortDiscussion => {
                    warn!(error = %e, "delta attribution aborted for discussion");
                    return Err(e);
                }
                AttributionPolicy::SkipAward => {
                    warn!(error = %e, "skipping award with broken parent chain");
                    summary.skipped.push(e);
                    continue;
                }
            },
        };

        let signal = &comments[si];
        let credited = &comments[di];
        let awarder = match signal.author.as_deref() {
            Some(a) if !signal.is_removed() && !credited.is_removed() => a,
            _ => {
                debug!(
                    confirmation = %confirmation.name,
                    "award signal or credited comment removed; skipping"
                );
                summary.skipped_removed += 1;
                continue;
            }
        };

        debug!(
            credited = %credited.name,
            depth = tree.depth(di),
            replies = tree.children(di).len(),
            awarder,
            justification = %anon_hash(&signal.body),
            "delta credited"
        );
        staged.push(StagedAward {
            target: di,
            awarder: awarder.to_string(),
            justification: signal.body.clone(),
        });
        summary.awarded += 1;
    }

    Ok((staged, summary))
}

/// confirmation index → (signal index, credited index)
fn resolve_chain(tree: &DiscussionTree<'_>, ci: usize) -> Result<(usize, usize), AttributionError> {
    let comments = tree.comments();
    let confirmation = &comments[ci];
    let si = tree
        .find_parent(ci)
        .ok_or_else(|| AttributionError::MissingSignalParent {
            confirmation: confirmation.name.clone(),
            parent_id: confirmation.parent_id.clone(),
        })?;
    let signal = &comments[si];
    let di = tree
        .find_parent(si)
        .ok_or_else(|| AttributionError::MissingAwardedParent {
            signal: signal.name.clone(),
            parent_id: signal.parent_id.clone(),
        })?;
    Ok((si, di))
}
