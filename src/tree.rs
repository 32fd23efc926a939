// src/tree.rs
//! Discussion Tree Resolver: parent/ancestor lookups over a flat comment list.
//!
//! The tree is never stored as nested objects. A `name -> index` map is built once per
//! discussion and every query walks `parent_id` references through it.
//!
//! "Not found" is an expected outcome: the parent may be the post itself, or a comment the
//! platform purged before collection.

use crate::discussion::Comment;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug)]
pub struct DiscussionTree<'a> {
    comments: &'a [Comment],
    by_name: HashMap<&'a str, usize>,
}

impl<'a> DiscussionTree<'a> {
    pub fn new(comments: &'a [Comment]) -> Self {
        let mut by_name = HashMap::with_capacity(comments.len());
        for (i, c) in comments.iter().enumerate() {
            if by_name.contains_key(c.name.as_str()) {
                warn!(name = %c.name, "duplicate comment name; keeping first occurrence");
                continue;
            }
            by_name.insert(c.name.as_str(), i);
        }
        Self { comments, by_name }
    }

    pub fn comments(&self) -> &'a [Comment] {
        self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Index of the comment with this fullname.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, idx: usize) -> Option<&'a Comment> {
        self.comments.get(idx)
    }

    /// Index of the comment `idx` replies to, or `None` if the parent is the post or missing.
    pub fn find_parent(&self, idx: usize) -> Option<usize> {
        let c = self.comments.get(idx)?;
        self.index_of(&c.parent_id)
    }

    /// Walk `hops` parents up. `hops == 0` yields `idx` itself.
    pub fn ancestor(&self, idx: usize, hops: usize) -> Option<usize> {
        if idx >= self.comments.len() {
            return None;
        }
        let mut cur = idx;
        for _ in 0..hops {
            cur = self.find_parent(cur)?;
        }
        Some(cur)
    }

    /// Direct replies to comment `idx`, in collection order.
    pub fn children(&self, idx: usize) -> Vec<usize> {
        let Some(parent) = self.comments.get(idx) else {
            return Vec::new();
        };
        self.comments
            .iter()
            .enumerate()
            .filter(|(i, c)| c.parent_id == parent.name && self.index_of(&c.name) == Some(*i))
            .map(|(i, _)| i)
            .collect()
    }

    /// Comments whose parent is not a comment in this collection (top-level replies and
    /// orphans of purged comments).
    pub fn roots(&self) -> Vec<usize> {
        (0..self.comments.len())
            .filter(|&i| self.find_parent(i).is_none())
            .collect()
    }

    /// Number of comment ancestors reachable from `idx`. Bounded by the collection size so
    /// malformed cyclic data cannot loop.
    pub fn depth(&self, idx: usize) -> usize {
        let mut depth = 0;
        let mut cur = idx;
        while let Some(p) = self.find_parent(cur) {
            depth += 1;
            if depth >= self.comments.len() {
                warn!(name = %self.comments[idx].name, "parent chain does not terminate");
                break;
            }
            cur = p;
        }
        depth
    }
}

/// Parent of `target` among `comments` (linear scan; build a [`DiscussionTree`] for repeated queries).
pub fn find_parent<'a>(comments: &'a [Comment], target: &Comment) -> Option<&'a Comment> {
    comments.iter().find(|c| c.name == target.parent_id)
}

/// `hops`-th ancestor of `target` among `comments`, by repeated [`find_parent`].
pub fn ancestor<'a>(comments: &'a [Comment], target: &'a Comment, hops: usize) -> Option<&'a Comment> {
    let mut cur = target;
    for _ in 0..hops {
        cur = find_parent(comments, cur)?;
    }
    Some(cur)
}
