//! Entry ⇄ HTML fragment codec.
//!
//! The host document is ordinary HTML that people also edit by hand, so the
//! codec defines a small grammar for what a post looks like inside it and
//! only ever trusts the parts of that grammar:
//!
//! ```text
//! block        := ARTICLE_OPEN ... HEADING ... CONTENT_OPEN body BOUNDARY ...
//! ARTICLE_OPEN := <article ... data-date="<rfc3339>" ...>
//! HEADING      := <h3 ...>plain text</h3>
//! CONTENT_OPEN := <div ... class="... post-content ..." ...>
//!               | <div ... class="p-6 pt-0 ... prose" ...>
//! BOUNDARY     := <div class="post-fade"></div>
//! ```
//!
//! A block runs from its `ARTICLE_OPEN` to the next one (or end of document).
//! The body ends at the dedicated `BOUNDARY` marker rather than the next
//! `</div>`, so bodies containing tables or nested `<div>`s decode intact.
//! Blocks written before the marker existed fall back to the first `</div>`.
//! The oldest pages carry neither marker nor `post-content`; their content
//! div is recognised by its `p-6 pt-0 ... prose` class alone.
//!
//! ## Limitations
//!
//! - Tags are written but never read back.
//! - The heading must be plain text. A block whose `<h3>` contains nested
//!   markup is skipped rather than guessed at.
//! - The human-readable date is display only. Ordering and feed dates come
//!   from `data-date` alone.

use crate::types::{DecodedEntry, Entry};
use maud::{PreEscaped, html};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Version of the fragment grammar, written as `data-format` on each block.
pub const FORMAT_VERSION: &str = "1";

/// Marker that terminates the content region.
pub const BODY_BOUNDARY: &str = r#"<div class="post-fade"></div>"#;

const ARTICLE_CLASS: &str = "group rounded-lg border border-border bg-card text-card-foreground shadow-sm transition-all hover:shadow-lg hover:border-accent/50 animate-slide-up";
const ARTICLE_STYLE: &str = "animation-delay: 0.1s; opacity: 0;";
const TITLE_CLASS: &str = "font-semibold leading-none tracking-tight text-lg font-mono group-hover:text-accent transition-colors";
const DATE_CLASS: &str = "text-xs text-muted-foreground font-mono whitespace-nowrap";
const CONTENT_CLASS: &str = "p-6 pt-0 text-muted-foreground prose post-content";
const TAGS_CLASS: &str = "px-6 pb-4 flex gap-2 flex-wrap";
const TAG_CLASS: &str = "text-xs font-mono px-2 py-1 rounded bg-muted text-muted-foreground";
const CHEVRON_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke-width="2" stroke="currentColor"><path stroke-linecap="round" stroke-linejoin="round" d="M19 9l-7 7-7-7" /></svg>"#;

static ARTICLE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<article\b[^>]*\bdata-date="([^"]*)"[^>]*>"#).expect("static regex")
});

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h3\b[^>]*>(.*?)</h3>").expect("static regex"));

static CONTENT_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<div\b[^>]*\bclass="(?:[^"]*\bpost-content\b[^"]*|p-6 pt-0[^"]*\bprose)"[^>]*>"#,
    )
    .expect("static regex")
});

const ENTITIES: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&#x27;", '\''),
    ("&apos;", '\''),
];

/// Why a block matched `ARTICLE_OPEN` but could not be recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unrecoverable {
    MissingHeading,
    NestedTitleMarkup,
    MissingContent,
}

/// Render one entry as a self-contained `<article>` block.
pub fn encode(entry: &Entry) -> String {
    html! {
        article class=(ARTICLE_CLASS) style=(ARTICLE_STYLE) data-format=(FORMAT_VERSION) data-date=(entry.iso_timestamp()) {
            div class="flex flex-col space-y-1.5 p-6" {
                div class="flex justify-between items-start gap-4" {
                    h3 class=(TITLE_CLASS) { (entry.title) }
                    span class=(DATE_CLASS) { (entry.display_date()) }
                }
            }
            div class=(CONTENT_CLASS) {
                (PreEscaped(&entry.body))
                (PreEscaped(BODY_BOUNDARY))
            }
            div class="px-6 pb-2" {
                button class="read-more-btn" onclick="togglePost(this)" {
                    span { "Continue reading..." }
                    (PreEscaped(CHEVRON_SVG))
                }
            }
            @if !entry.tags.is_empty() {
                div class=(TAGS_CLASS) {
                    @for tag in &entry.tags {
                        span class=(TAG_CLASS) { "#" (tag) }
                    }
                }
            }
        }
    }
    .into_string()
}

/// Recover every post block from a full document, in document order.
///
/// Zero blocks is a normal state and yields an empty vector.
pub fn decode(document: &str) -> Vec<DecodedEntry> {
    let opens: Vec<_> = ARTICLE_OPEN.captures_iter(document).collect();
    let mut entries = Vec::with_capacity(opens.len());

    for (i, caps) in opens.iter().enumerate() {
        let (Some(open), Some(date)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = opens
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(document.len(), |next| next.start());
        let timestamp = unescape_html(date.as_str());

        match decode_block(&document[open.end()..end]) {
            Ok((title, body)) => entries.push(DecodedEntry {
                timestamp,
                title,
                body,
            }),
            Err(reason) => warn!(%timestamp, ?reason, "skipping unrecoverable post block"),
        }
    }

    entries
}

fn decode_block(block: &str) -> Result<(String, String), Unrecoverable> {
    let heading = HEADING
        .captures(block)
        .ok_or(Unrecoverable::MissingHeading)?;
    let (Some(whole), Some(text)) = (heading.get(0), heading.get(1)) else {
        return Err(Unrecoverable::MissingHeading);
    };
    if text.as_str().contains('<') {
        return Err(Unrecoverable::NestedTitleMarkup);
    }
    let title = unescape_html(text.as_str().trim());

    let after_heading = &block[whole.end()..];
    let content_open = CONTENT_OPEN
        .find(after_heading)
        .ok_or(Unrecoverable::MissingContent)?;
    let rest = &after_heading[content_open.end()..];
    let body_end = rest
        .find(BODY_BOUNDARY)
        .or_else(|| rest.find("</div>"))
        .ok_or(Unrecoverable::MissingContent)?;

    Ok((title, rest[..body_end].trim().to_string()))
}

/// Escape text for HTML/XML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    html! { (text) }.into_string()
}

/// Decode the handful of entities [`escape_html`] and common editors emit.
///
/// Single pass, so `&amp;lt;` becomes `&lt;`, not `<`. Unknown entities are
/// left as written.
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| tail.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
