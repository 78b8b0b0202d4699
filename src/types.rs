//! Shared types passed between the codec, the store, the feed and the CLI.
//!
//! There are three shapes of "a post", one per direction of travel:
//!
//! - [`EntryDescriptor`]: what an input source (CLI arguments, the console,
//!   a draft file, a test) asks to publish. The body is still raw markdown.
//! - [`Entry`]: a fully built post with transformed body and a timestamp,
//!   ready to be encoded into the host document.
//! - [`DecodedEntry`]: what can be recovered back out of the host document.
//!   Partial by construction: tags are not recovered.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Serialize;

/// Human-readable date shown next to the title, e.g. `2024-12-22::14:30`.
///
/// Display only. Nothing ever parses this back.
const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d::%H:%M";

/// A request to publish a post, before any markup transform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryDescriptor {
    pub title: String,
    /// Raw markdown content.
    pub raw_body: String,
    pub tags: Vec<String>,
}

impl EntryDescriptor {
    pub fn new(title: impl Into<String>, raw_body: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            raw_body: raw_body.into(),
            tags,
        }
    }
}

/// One published post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub timestamp: DateTime<FixedOffset>,
    /// Already-transformed HTML. Opaque to the store.
    pub body: String,
    /// Ordered set: trimmed, non-empty, first occurrence wins.
    pub tags: Vec<String>,
}

impl Entry {
    /// Build an entry, normalizing the tag list.
    pub fn new(
        title: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
        body: impl Into<String>,
        tags: &[String],
    ) -> Self {
        Self {
            title: title.into(),
            timestamp,
            body: body.into(),
            tags: normalize_tags(tags),
        }
    }

    /// Machine timestamp written to the `data-date` attribute.
    pub fn iso_timestamp(&self) -> String {
        format_iso_timestamp(&self.timestamp)
    }

    /// Human-readable date shown under the title.
    pub fn display_date(&self) -> String {
        self.timestamp.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

/// A post recovered from the host document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedEntry {
    /// Raw `data-date` attribute value, not validated.
    pub timestamp: String,
    /// Heading text with HTML entities decoded.
    pub title: String,
    /// Content region markup, trimmed.
    pub body: String,
}

/// RFC 3339 with only as many fractional digits as needed.
pub fn format_iso_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Normalize a tag list into an ordered set.
///
/// Each tag is trimmed and empty tags are dropped. Exact duplicates are
/// removed keeping the first occurrence; case is preserved, so `AI` and `ai`
/// are distinct tags.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Split a comma-separated tag string (`"ai, local,"`) into a normalized set.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    let parts: Vec<&str> = raw.split(',').collect();
    normalize_tags(parts.as_slice())
}
