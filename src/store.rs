//! The host document as an append-only content store.
//!
//! New fragments go directly after the anchor, so the document reads
//! newest-first without ever rewriting existing content. Every operation is
//! a whole-file read, an in-memory edit, and a whole-file write. There is no
//! locking: one writer at a time is assumed, and a crash mid-write can leave
//! a truncated document.

use crate::codec;
use crate::types::DecodedEntry;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("host document not found: {0}")]
    MissingHost(PathBuf),
    #[error("anchor {anchor:?} not found in {path}")]
    AnchorNotFound { anchor: String, path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
    anchor: String,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>, anchor: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            anchor: anchor.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Insert `fragment` immediately after the first occurrence of the anchor.
    ///
    /// Nothing is written unless the document exists and contains the anchor.
    pub fn append(&self, fragment: &str) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Err(StoreError::MissingHost(self.path.clone()));
        }
        let document = std::fs::read_to_string(&self.path)?;
        let updated = insert_after_anchor(&document, &self.anchor, fragment).ok_or_else(|| {
            StoreError::AnchorNotFound {
                anchor: self.anchor.clone(),
                path: self.path.clone(),
            }
        })?;

        let occurrences = document.matches(self.anchor.as_str()).count();
        if occurrences > 1 {
            warn!(
                path = %self.path.display(),
                occurrences,
                "anchor appears more than once; inserting after the first"
            );
        }

        std::fs::write(&self.path, updated)?;
        debug!(path = %self.path.display(), bytes = fragment.len(), "appended fragment");
        Ok(())
    }

    /// Decode every post currently in the document, newest first.
    ///
    /// A missing document is an empty store.
    pub fn scan(&self) -> Result<Vec<DecodedEntry>, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "host document absent, nothing to scan");
            return Ok(Vec::new());
        }
        let document = std::fs::read_to_string(&self.path)?;
        Ok(codec::decode(&document))
    }
}

/// Splice `"\n" + fragment` in after the first `anchor`. `None` if absent.
fn insert_after_anchor(document: &str, anchor: &str, fragment: &str) -> Option<String> {
    if anchor.is_empty() {
        return None;
    }
    let at = document.find(anchor)? + anchor.len();
    let mut out = String::with_capacity(document.len() + fragment.len() + 1);
    out.push_str(&document[..at]);
    out.push('\n');
    out.push_str(fragment);
    out.push_str(&document[at..]);
    Some(out)
}
