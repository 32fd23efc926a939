// src/links.rs
//! Link extraction from comments (pluggable).
//!
//! - [`HrefLinkExtractor`] reads `href` targets from `body_html`.
//! - [`TextLinkExtractor`] scans the plain body for URL-looking words.
//!
//! Reddit-internal links are never reported.

use crate::discussion::Comment;
use once_cell::sync::Lazy;
use regex::Regex;

/// Substrings that make a plain-text word count as a link.
pub const LINK_MARKERS: [&str; 8] = [
    "http://", "https://", ".com", ".org", ".gov", ".pdf", ".net", "www.",
];

const INTERNAL_HOST: &str = "reddit.com";

pub trait LinkExtractor: Send + Sync {
    fn extract(&self, comment: &Comment) -> Vec<String>;
}

fn is_internal(link: &str) -> bool {
    link.to_ascii_lowercase().contains(INTERNAL_HOST)
}

/// `href="..."` targets of the rendered comment, HTML entities decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct HrefLinkExtractor;

impl LinkExtractor for HrefLinkExtractor {
    fn extract(&self, comment: &Comment) -> Vec<String> {
        static RE_HREF: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).expect("href regex"));

        let Some(html) = comment.body_html.as_deref() else {
            return Vec::new();
        };
        // body_html arrives entity-escaped (`&lt;a href=...&gt;`)
        let html = html_escape::decode_html_entities(html);

        let mut out = Vec::new();
        for caps in RE_HREF.captures_iter(&html) {
            let link = html_escape::decode_html_entities(&caps[1]).trim().to_string();
            if link.is_empty() || link.starts_with('/') || is_internal(&link) {
                continue;
            }
            if !out.contains(&link) {
                out.push(link);
            }
        }
        out
    }
}

/// Lowercased words of the body that contain a [`LINK_MARKERS`] entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLinkExtractor;

impl LinkExtractor for TextLinkExtractor {
    fn extract(&self, comment: &Comment) -> Vec<String> {
        comment
            .body
            .to_lowercase()
            .split_whitespace()
            .filter(|w| LINK_MARKERS.iter().any(|m| w.contains(m)) && !is_internal(w))
            .map(str::to_string)
            .collect()
    }
}
