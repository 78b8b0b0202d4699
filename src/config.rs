//! Site configuration module.
//!
//! Handles loading, validating, and merging `sitepost.toml`. Stock defaults
//! are overridden by the user file at the site root (or the path passed with
//! `--config`). Everything the feed and the store need to know about the site
//! lives here and is passed in explicitly, never read from globals.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "My Site"
//! url = "https://example.com"
//! description = "Notes, experiments, and ideas."
//! author = "anonymous"
//! language = "en-us"
//!
//! [store]
//! document = "index.html"
//! anchor = '<main id="content-feed" class="space-y-6">'
//!
//! [feed]
//! path = "feed.xml"
//! max_items = 20
//!
//! [drafts]
//! dir = "drafts"
//! archive_dir = "posts"
//!
//! [markdown]
//! enabled = true
//!
//! [tracker]
//! program = "bd"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the site root when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "sitepost.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("config file not found: {0}")]
    MissingFile(PathBuf),
}

/// Site configuration loaded from `sitepost.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Channel metadata for the feed.
    pub site: SiteMeta,
    /// Host document and injection anchor.
    pub store: StoreConfig,
    /// Feed output settings.
    pub feed: FeedConfig,
    /// Draft and archive folders.
    pub drafts: DraftsConfig,
    /// Rich markdown transform toggle.
    pub markdown: MarkdownConfig,
    /// External task tracker.
    pub tracker: TrackerConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.anchor.is_empty() {
            return Err(ConfigError::Validation(
                "store.anchor must not be empty".into(),
            ));
        }
        if self.store.document.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store.document must not be empty".into(),
            ));
        }
        if self.site.url.trim().is_empty() {
            return Err(ConfigError::Validation("site.url must not be empty".into()));
        }
        if self.feed.path.trim().is_empty() {
            return Err(ConfigError::Validation("feed.path must not be empty".into()));
        }
        if self.feed.max_items == 0 {
            return Err(ConfigError::Validation(
                "feed.max_items must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Channel-level metadata. Supplied, never inferred.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    /// Public site URL. Used as every item's link and guid base.
    pub url: String,
    pub description: String,
    pub author: String,
    pub language: String,
}

impl SiteMeta {
    /// Site URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "My Site".to_string(),
            url: "https://example.com".to_string(),
            description: "Notes, experiments, and ideas.".to_string(),
            author: "anonymous".to_string(),
            language: "en-us".to_string(),
        }
    }
}

/// Where posts are injected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Host document, relative to the site root.
    pub document: String,
    /// Marker the host document must declare exactly once. New posts go
    /// directly after it.
    pub anchor: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            document: "index.html".to_string(),
            anchor: r#"<main id="content-feed" class="space-y-6">"#.to_string(),
        }
    }
}

/// Feed output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Output file, relative to the site root. Overwritten on every run.
    pub path: String,
    /// Number of most recent posts included.
    pub max_items: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: "feed.xml".to_string(),
            max_items: 20,
        }
    }
}

/// Draft folders, relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DraftsConfig {
    pub dir: String,
    /// Published drafts are moved here as `YYYY-MM-DD-<name>.md`.
    pub archive_dir: String,
}

impl Default for DraftsConfig {
    fn default() -> Self {
        Self {
            dir: "drafts".to_string(),
            archive_dir: "posts".to_string(),
        }
    }
}

/// Rich markdown transform toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    /// When false (or when built without the `markdown` feature) posts are
    /// rendered as escaped plain paragraphs.
    pub enabled: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// External task tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Executable invoked for `ready`, `create` and `close`.
    pub program: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            program: "bd".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `sitepost.toml` from the site root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    load_config_file(&root.join(CONFIG_FILE_NAME))
}

/// Load a specific config file, falling back to stock defaults if absent.
pub fn load_config_file(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Load a config file the user named explicitly. It must exist.
pub fn load_explicit_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }
    load_config_file(path)
}

/// Returns a fully-commented stock `sitepost.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sitepost configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site metadata (feed channel)
# ---------------------------------------------------------------------------
[site]
title = "My Site"
# Public URL. Every feed item links here; guids are "<url>#<title-slug>".
url = "https://example.com"
description = "Notes, experiments, and ideas."
author = "anonymous"
language = "en-us"

# ---------------------------------------------------------------------------
# Host document
# ---------------------------------------------------------------------------
[store]
# HTML page that holds the posts, relative to the site root.
document = "index.html"
# Marker that must appear exactly once in the document. New posts are
# inserted directly after it, so the newest post is always first.
anchor = '<main id="content-feed" class="space-y-6">'

# ---------------------------------------------------------------------------
# RSS feed
# ---------------------------------------------------------------------------
[feed]
# Output file, regenerated from scratch on every run.
path = "feed.xml"
# Number of most recent posts included.
max_items = 20

# ---------------------------------------------------------------------------
# Drafts
# ---------------------------------------------------------------------------
[drafts]
# Folder scanned for *.md drafts.
dir = "drafts"
# Published drafts are moved here as YYYY-MM-DD-<name>.md.
archive_dir = "posts"

# ---------------------------------------------------------------------------
# Markdown
# ---------------------------------------------------------------------------
[markdown]
# Set to false to publish posts as escaped plain paragraphs.
enabled = true

# ---------------------------------------------------------------------------
# Task tracker
# ---------------------------------------------------------------------------
[tracker]
# Executable used by the idea / ready / publish commands.
program = "bd"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_store_anchor() {
        let config = SiteConfig::default();
        assert_eq!(config.store.document, "index.html");
        assert_eq!(
            config.store.anchor,
            r#"<main id="content-feed" class="space-y-6">"#
        );
    }

    #[test]
    fn default_config_has_feed_settings() {
        let config = SiteConfig::default();
        assert_eq!(config.feed.path, "feed.xml");
        assert_eq!(config.feed.max_items, 20);
        assert!(config.markdown.enabled);
        assert_eq!(config.tracker.program, "bd");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[site]
title = "WF-AI Site"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site.title, "WF-AI Site");
        // Defaults preserved
        assert_eq!(config.site.language, "en-us");
        assert_eq!(config.drafts.dir, "drafts");
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let mut meta = SiteMeta::default();
        meta.url = "https://example.com/blog/".to_string();
        assert_eq!(meta.base_url(), "https://example.com/blog");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "My Site");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
[site]
url = "https://w4ester.github.io/wf-ai-site"
author = "w4ester"

[feed]
max_items = 5
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.url, "https://w4ester.github.io/wf-ai-site");
        assert_eq!(config.site.author, "w4ester");
        assert_eq!(config.feed.max_items, 5);
        // Unspecified values should be defaults
        assert_eq!(config.feed.path, "feed.xml");
    }

    #[test]
    fn load_config_file_at_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("other.toml");
        fs::write(&path, "[markdown]\nenabled = false\n").unwrap();
        let config = load_config_file(&path).unwrap();
        assert!(!config.markdown.enabled);
    }

    #[test]
    fn explicit_config_must_exist() {
        let tmp = TempDir::new().unwrap();
        let result = load_explicit_config(&tmp.path().join("custom.toml"));
        assert!(matches!(result, Err(ConfigError::MissingFile(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[feed]
max_itms = 10
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[sitee]\ntitle = \"x\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_anchor() {
        let mut config = SiteConfig::default();
        config.store.anchor = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("anchor"));
    }

    #[test]
    fn validate_zero_max_items() {
        let mut config = SiteConfig::default();
        config.feed.max_items = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_url() {
        let mut config = SiteConfig::default();
        config.site.url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "[feed]\nmax_items = 0\n").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[feed]\npath = \"feed.xml\"\nmax_items = 20\n").unwrap();
        let overlay: toml::Value = toml::from_str("[feed]\nmax_items = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        let feed = merged.get("feed").unwrap();
        assert_eq!(feed.get("max_items").unwrap().as_integer(), Some(3));
        assert_eq!(feed.get("path").unwrap().as_str(), Some("feed.xml"));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("a = 10").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(10));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(2));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("[store]\nanchor = \"\"\n").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.url, defaults.site.url);
        assert_eq!(config.store.anchor, defaults.store.anchor);
        assert_eq!(config.feed.max_items, defaults.feed.max_items);
        assert_eq!(config.drafts.archive_dir, defaults.drafts.archive_dir);
        assert_eq!(config.tracker.program, defaults.tracker.program);
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[site]", "[store]", "[feed]", "[drafts]", "[markdown]", "[tracker]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        for key in ["site", "store", "feed", "drafts", "markdown", "tracker"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}
