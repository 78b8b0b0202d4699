//! RSS 2.0 synthesis from recovered posts.
//!
//! The feed is derived data: every run rebuilds it from the host document
//! and overwrites the previous file. Items keep store order (newest first)
//! and are capped at `feed.max_items`.
//!
//! Only the machine timestamp is trusted for `pubDate`. A block whose
//! `data-date` cannot be parsed still produces an item, dated with the
//! synthesis clock.

use crate::codec::escape_html;
use crate::config::SiteConfig;
use crate::naming::feed_slug;
use crate::types::DecodedEntry;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Naive layouts accepted for legacy `data-date` values. Interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed timestamp: {0:?}")]
    MalformedTimestamp(String),
}

/// Channel-level metadata, all taken from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedContext {
    pub title: String,
    /// Site URL as configured, used for `<link>`.
    pub link: String,
    /// Site URL without a trailing slash, used to build guids and self link.
    pub base_url: String,
    pub description: String,
    pub language: String,
    pub author: String,
    /// File name the feed is published under, for the `atom:link` self reference.
    pub feed_file: String,
    pub max_items: usize,
}

impl FeedContext {
    pub fn from_config(config: &SiteConfig) -> Self {
        let feed_file = Path::new(&config.feed.path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.feed.path.clone());
        Self {
            title: config.site.title.clone(),
            link: config.site.url.clone(),
            base_url: config.site.base_url().to_string(),
            description: config.site.description.clone(),
            language: config.site.language.clone(),
            author: config.site.author.clone(),
            feed_file,
            max_items: config.feed.max_items,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// Raw body markup, emitted inside CDATA.
    pub description: String,
    pub guid: String,
    pub pub_date: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    pub context: FeedContext,
    pub last_build: DateTime<Utc>,
    pub items: Vec<FeedItem>,
}

/// Build a feed from the first `max_items` entries, in the order given.
pub fn synthesize(entries: &[DecodedEntry], context: &FeedContext, now: DateTime<Utc>) -> Feed {
    let items = entries
        .iter()
        .take(context.max_items)
        .map(|entry| {
            let pub_date = parse_timestamp(&entry.timestamp).unwrap_or_else(|err| {
                warn!(title = %entry.title, %err, "using build time as pubDate");
                now.fixed_offset()
            });
            FeedItem {
                title: entry.title.clone(),
                link: context.link.clone(),
                description: entry.body.clone(),
                guid: format!("{}#{}", context.base_url, feed_slug(&entry.title)),
                pub_date,
            }
        })
        .collect();

    Feed {
        context: context.clone(),
        last_build: now,
        items,
    }
}

/// Parse a `data-date` value.
///
/// RFC 3339 keeps its offset. Naive date-times and bare dates are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, FeedError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed);
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
        .ok_or_else(|| FeedError::MalformedTimestamp(raw.to_string()))
}

impl Feed {
    pub fn render(&self) -> String {
        let ctx = &self.context;
        let items: String = self.items.iter().map(FeedItem::render).collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>{title}</title>
    <link>{link}</link>
    <description>{description}</description>
    <language>{language}</language>
    <lastBuildDate>{last_build}</lastBuildDate>
    <atom:link href="{self_link}" rel="self" type="application/rss+xml"/>
    <author>{author}</author>
{items}  </channel>
</rss>
"#,
            title = escape_html(&ctx.title),
            link = escape_html(&ctx.link),
            description = escape_html(&ctx.description),
            language = escape_html(&ctx.language),
            last_build = self.last_build.to_rfc2822(),
            self_link = escape_html(&format!("{}/{}", ctx.base_url, ctx.feed_file)),
            author = escape_html(&ctx.author),
        )
    }
}

impl FeedItem {
    fn render(&self) -> String {
        format!(
            "    <item>\n      <title>{}</title>\n      <link>{}</link>\n      <description>{}</description>\n      <pubDate>{}</pubDate>\n      <guid>{}</guid>\n    </item>\n",
            escape_html(&self.title),
            escape_html(&self.link),
            cdata(&self.description),
            self.pub_date.to_rfc2822(),
            escape_html(&self.guid),
        )
    }
}

/// Wrap text in CDATA, splitting any `]]>` across two sections.
fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

/// Overwrite `path` with the rendered feed.
pub fn write_feed(path: &Path, feed: &Feed) -> Result<(), FeedError> {
    std::fs::write(path, feed.render())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{decoded, fixed_utc};
    use tempfile::TempDir;

    fn context() -> FeedContext {
        FeedContext::from_config(&SiteConfig::default())
    }

    // =========================================================================
    // Timestamps
    // =========================================================================

    #[test]
    fn parse_rfc3339_keeps_offset() {
        let ts = parse_timestamp("2024-12-22T14:30:05+01:00").unwrap();
        assert_eq!(ts.to_rfc2822(), "Sun, 22 Dec 2024 14:30:05 +0100");
    }

    #[test]
    fn parse_naive_iso_as_utc() {
        let ts = parse_timestamp("2024-12-22T14:30:05.123456").unwrap();
        assert_eq!(ts.to_rfc2822(), "Sun, 22 Dec 2024 14:30:05 +0000");
    }

    #[test]
    fn parse_date_only_as_midnight_utc() {
        let ts = parse_timestamp("2024-12-22").unwrap();
        assert_eq!(ts.to_rfc2822(), "Sun, 22 Dec 2024 00:00:00 +0000");
    }

    #[test]
    fn parse_garbage_is_malformed() {
        let err = parse_timestamp("yesterday-ish").unwrap_err();
        assert!(matches!(err, FeedError::MalformedTimestamp(ref s) if s == "yesterday-ish"));
    }

    // =========================================================================
    // Synthesis
    // =========================================================================

    #[test]
    fn empty_input_is_valid_feed() {
        let feed = synthesize(&[], &context(), fixed_utc());
        assert!(feed.items.is_empty());
        let xml = feed.render();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<channel>"));
        assert!(xml.trim_end().ends_with("</rss>"));
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn items_keep_store_order_and_cap() {
        let mut ctx = context();
        ctx.max_items = 2;
        let entries = vec![
            decoded("C", "2024-03-01T00:00:00Z", ""),
            decoded("A", "2024-01-01T00:00:00Z", ""),
            decoded("B", "2024-02-01T00:00:00Z", ""),
        ];
        let feed = synthesize(&entries, &ctx, fixed_utc());
        let titles: Vec<_> = feed.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A"]);
    }

    #[test]
    fn default_cap_is_twenty() {
        let entries: Vec<_> = (0..25)
            .map(|i| decoded(&format!("Post {i}"), "2024-01-01T00:00:00Z", ""))
            .collect();
        assert_eq!(synthesize(&entries, &context(), fixed_utc()).items.len(), 20);
    }

    #[test]
    fn guid_uses_slug_of_title() {
        let feed = synthesize(
            &[decoded("Hello   World\tAgain", "2024-01-01T00:00:00Z", "")],
            &context(),
            fixed_utc(),
        );
        assert_eq!(feed.items[0].guid, "https://example.com#hello-world-again");
    }

    #[test]
    fn malformed_timestamp_uses_build_time() {
        let feed = synthesize(&[decoded("T", "not a date", "")], &context(), fixed_utc());
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].pub_date, fixed_utc().fixed_offset());
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[test]
    fn render_escapes_title_and_guid() {
        let feed = synthesize(
            &[decoded("Fish & <Chips>", "2024-01-01T00:00:00Z", "")],
            &context(),
            fixed_utc(),
        );
        let xml = feed.render();
        assert!(xml.contains("<title>Fish &amp; &lt;Chips&gt;</title>"));
        assert!(xml.contains("<guid>https://example.com#fish-&amp;-&lt;chips&gt;</guid>"));
    }

    #[test]
    fn render_wraps_body_in_cdata() {
        let feed = synthesize(
            &[decoded("T", "2024-01-01T00:00:00Z", "<p>Hi & bye</p>")],
            &context(),
            fixed_utc(),
        );
        assert!(feed.render().contains("<description><![CDATA[<p>Hi & bye</p>]]></description>"));
    }

    #[test]
    fn cdata_splits_terminator() {
        assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
    }

    #[test]
    fn render_channel_metadata() {
        let xml = synthesize(&[], &context(), fixed_utc()).render();
        assert!(xml.contains("<title>My Site</title>"));
        assert!(xml.contains("<link>https://example.com</link>"));
        assert!(xml.contains("<language>en-us</language>"));
        assert!(xml.contains("<lastBuildDate>Sun, 22 Dec 2024 14:30:05 +0000</lastBuildDate>"));
        assert!(xml.contains(r#"<atom:link href="https://example.com/feed.xml" rel="self""#));
        assert!(xml.contains("<author>anonymous</author>"));
    }

    #[test]
    fn self_link_uses_feed_file_name_and_trimmed_url() {
        let mut config = SiteConfig::default();
        config.site.url = "https://blog.test/".into();
        config.feed.path = "public/rss.xml".into();
        let xml = synthesize(&[], &FeedContext::from_config(&config), fixed_utc()).render();
        assert!(xml.contains(r#"href="https://blog.test/rss.xml""#));
        assert!(xml.contains("<link>https://blog.test/</link>"));
    }

    #[test]
    fn write_feed_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("feed.xml");
        std::fs::write(&path, "stale").unwrap();

        let feed = synthesize(&[decoded("T", "2024-01-15", "")], &context(), fixed_utc());
        write_feed(&path, &feed).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale"));
        assert!(written.contains("<pubDate>Mon, 15 Jan 2024 00:00:00 +0000</pubDate>"));
    }
}
