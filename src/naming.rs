//! Centralized name derivation for drafts, archives and feed guids.
//!
//! Every place that turns a file name into a title (or a title into a file
//! name or slug) goes through here so the conventions stay consistent:
//!
//! - `hello-world.md` → "Hello World" (draft title fallback)
//! - `hello-world` on 2024-12-22 → `2024-12-22-hello-world.md` (archive)
//! - "Hello  World" → `hello-world` (feed guid fragment)

use chrono::NaiveDate;

pub const DRAFT_EXTENSION: &str = "md";

/// First non-empty, trimmed value in priority order.
///
/// ```text
/// title: resolve(&[frontmatter_title, stem_title])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Draft file name for a user-supplied name, adding `.md` when missing.
pub fn draft_file_name(name: &str) -> String {
    let suffix = format!(".{DRAFT_EXTENSION}");
    if name.ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

/// Display title from a file stem: dashes become spaces, words title-cased.
///
/// A letter is upper-cased when the character before it is not a letter and
/// lower-cased otherwise, so `my-LLM-notes` becomes "My Llm Notes".
pub fn title_from_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut prev_alpha = false;
    for ch in stem.chars().map(|c| if c == '-' { ' ' } else { c }) {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Archive file name: `YYYY-MM-DD-<stem>.md`.
pub fn archive_file_name(date: NaiveDate, stem: &str) -> String {
    format!("{}-{stem}.{DRAFT_EXTENSION}", date.format("%Y-%m-%d"))
}

/// Guid fragment for a post title: lower-cased, whitespace runs → `-`.
///
/// Not escaped; the feed renderer escapes it along with the rest of the guid.
pub fn feed_slug(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
