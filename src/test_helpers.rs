//! Shared test utilities for the sitepost test suite.
//!
//! Provides a fixed clock, entry builders, and a fixture site that can be
//! copied into a temp directory and mutated freely.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let site = Site::open(tmp.path(), SiteConfig::default()).unwrap();
//! site.create_post(&descriptor("Hello", "Hi"), fixed_time()).unwrap();
//!
//! assert_eq!(post_titles(&site.posts().unwrap()), vec!["Hello"]);
//! ```

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::path::Path;
use tempfile::TempDir;

use crate::config::StoreConfig;
use crate::types::{DecodedEntry, Entry, EntryDescriptor};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Minimal host document containing the default anchor and nothing else.
pub fn host_document() -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<body>\n{}\n</main>\n</body>\n</html>\n",
        StoreConfig::default().anchor
    )
}

/// Write [`host_document`] as `index.html` in `dir` and return its path.
pub fn write_host(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("index.html");
    std::fs::write(&path, host_document()).unwrap();
    path
}

// =========================================================================
// Clock and builders
// =========================================================================

/// 2024-12-22T14:30:05Z as a fixed-offset time.
pub fn fixed_time() -> DateTime<FixedOffset> {
    fixed_utc().fixed_offset()
}

/// Same instant as [`fixed_time`], for feed synthesis.
pub fn fixed_utc() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 22, 14, 30, 5).unwrap()
}

/// Build an entry stamped with [`fixed_time`].
pub fn entry(title: &str, body: &str, tags: &[&str]) -> Entry {
    let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
    Entry::new(title, fixed_time(), body, &tags)
}

/// Build an untagged descriptor.
pub fn descriptor(title: &str, body: &str) -> EntryDescriptor {
    EntryDescriptor::new(title, body, Vec::new())
}

/// Build a decoded entry as the store would return it.
pub fn decoded(title: &str, timestamp: &str, body: &str) -> DecodedEntry {
    DecodedEntry {
        timestamp: timestamp.to_string(),
        title: title.to_string(),
        body: body.to_string(),
    }
}

// =========================================================================
// Extractors
// =========================================================================

/// All titles in store order.
pub fn post_titles(posts: &[DecodedEntry]) -> Vec<&str> {
    posts.iter().map(|p| p.title.as_str()).collect()
}
