//! Raw post content → display markup.
//!
//! Two strategies implement [`TextTransform`]:
//!
//! | Strategy | When | Output |
//! |---|---|---|
//! | `RichTransform` | built with the `markdown` feature and enabled in config | CommonMark with tables, fenced code, strikethrough, newline → `<br />`, styled images |
//! | [`PlainTransform`] | otherwise | blank-line separated paragraphs, HTML-escaped, each wrapped in `<p>` |
//!
//! The strategy is chosen once by [`select_transform`] and injected into the
//! [`Site`](crate::site::Site). Call sites never branch on availability.

use crate::config::MarkdownConfig;
use maud::html;
use regex::Regex;
use std::sync::LazyLock;

/// Class added to every unstyled `<img>` so images scale with the column.
pub const IMAGE_CLASS: &str = "w-full max-w-2xl rounded-lg shadow-md my-4 mx-auto";

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img\s+([^>]*)>").expect("static regex"));

static STYLE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(^|\s)(class|style)\s*=").expect("static regex"));

/// Converts a raw content block into display markup. Pure.
pub trait TextTransform {
    fn transform(&self, raw: &str) -> String;
}

/// Whether the rich transform could be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Rich,
    /// Rich transform not compiled in or disabled; plain fallback in use.
    Unavailable,
}

/// Fallback: escaped paragraphs split on blank lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTransform;

impl TextTransform for PlainTransform {
    fn transform(&self, raw: &str) -> String {
        let normalized = raw.replace("\r\n", "\n");
        normalized
            .split("\n\n")
            .filter(|para| !para.trim().is_empty())
            .map(|para| html! { p { (para) } }.into_string())
            .collect()
    }
}

#[cfg(feature = "markdown")]
pub use rich::RichTransform;

#[cfg(feature = "markdown")]
mod rich {
    use super::{TextTransform, style_images};
    use pulldown_cmark::{Event, Options, Parser, html as md_html};

    /// CommonMark via pulldown-cmark, soft breaks rendered as `<br />`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RichTransform;

    impl TextTransform for RichTransform {
        fn transform(&self, raw: &str) -> String {
            let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
            let events = Parser::new_ext(raw, options).map(|event| match event {
                Event::SoftBreak => Event::HardBreak,
                other => other,
            });
            let mut out = String::new();
            md_html::push_html(&mut out, events);
            style_images(&out)
        }
    }
}

/// Pick the transform strategy once at startup.
pub fn select_transform(config: &MarkdownConfig) -> (Box<dyn TextTransform>, Capability) {
    match rich_transform() {
        Some(rich) if config.enabled => (rich, Capability::Rich),
        _ => (Box::new(PlainTransform), Capability::Unavailable),
    }
}

#[cfg(feature = "markdown")]
fn rich_transform() -> Option<Box<dyn TextTransform>> {
    Some(Box::new(RichTransform))
}

#[cfg(not(feature = "markdown"))]
fn rich_transform() -> Option<Box<dyn TextTransform>> {
    None
}

/// Add [`IMAGE_CLASS`] to every `<img>` that has no `class` or `style`.
///
/// Images that already declare either attribute are left byte-for-byte
/// unchanged, so applying this twice equals applying it once.
pub fn style_images(html: &str) -> String {
    IMG_TAG
        .replace_all(html, |caps: &regex::Captures| {
            let attrs = &caps[1];
            if STYLE_ATTR.is_match(attrs) {
                caps[0].to_string()
            } else {
                format!(r#"<img class="{IMAGE_CLASS}" {attrs}>"#)
            }
        })
        .into_owned()
}
