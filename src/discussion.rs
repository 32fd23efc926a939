// src/discussion.rs
//! Discussion records as delivered by the content API (one post + a flat comment list).
//!
//! Only the fields the analysis needs are typed. Everything else the API returned is kept
//! in `extra` and written back untouched, including the informational `_replies` list.

use crate::classify::Classification;
use crate::delta::DeltaRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body markers the platform uses for deleted/removed content.
pub const REMOVED_BODIES: [&str; 2] = ["[deleted]", "[removed]"];

/// Fullname prefix of comments.
pub const COMMENT_PREFIX: &str = "t1_";
/// Fullname prefix of posts (links).
pub const POST_PREFIX: &str = "t3_";

/// What a `parent_id` points at, judged by its fullname prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef<'a> {
    Comment(&'a str),
    Post(&'a str),
    Other(&'a str),
}

impl<'a> ParentRef<'a> {
    pub fn parse(parent_id: &'a str) -> Self {
        if parent_id.starts_with(COMMENT_PREFIX) {
            ParentRef::Comment(parent_id)
        } else if parent_id.starts_with(POST_PREFIX) {
            ParentRef::Post(parent_id)
        } else {
            ParentRef::Other(parent_id)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    /// Globally unique fullname, e.g. `t1_e4abc12`.
    pub name: String,
    /// Fullname of the post or comment this replies to.
    pub parent_id: String,
    /// `None` when the account or comment was removed.
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_use: Option<Classification>,
    #[serde(default)]
    pub delta: DeltaRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Comment {
    /// Minimal comment, mostly for tests and fixtures.
    pub fn new(
        name: impl Into<String>,
        parent_id: impl Into<String>,
        author: Option<&str>,
        body: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let id = name
            .strip_prefix(COMMENT_PREFIX)
            .unwrap_or(name.as_str())
            .to_string();
        Self {
            id,
            name,
            parent_id: parent_id.into(),
            author: author.map(str::to_string),
            body: body.into(),
            body_html: None,
            evidence_use: None,
            delta: DeltaRecord::default(),
            links: None,
            extra: Map::new(),
        }
    }

    pub fn parent(&self) -> ParentRef<'_> {
        ParentRef::parse(&self.parent_id)
    }

    /// Null author or a deleted/removed body.
    pub fn is_removed(&self) -> bool {
        self.author.is_none() || REMOVED_BODIES.contains(&self.body.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(rename = "_comments", default)]
    pub comments: Vec<Comment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Classification>,
    /// Delta confirmations posted in the discussion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_deltas: Option<usize>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    pub fn new(title: impl Into<String>, selftext: impl Into<String>, author: Option<&str>) -> Self {
        Self {
            name: None,
            title: title.into(),
            selftext: selftext.into(),
            author: author.map(str::to_string),
            comments: Vec::new(),
            topic: None,
            total_deltas: None,
            extra: Map::new(),
        }
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    /// Text classified for the post's topic: title and selftext joined by a space.
    pub fn classification_text(&self) -> String {
        format!("{} {}", self.title, self.selftext)
    }

    pub fn is_removed(&self) -> bool {
        self.author.is_none()
    }

    /// Short label for log lines.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed post>")
    }
}
