//! Markdown drafts waiting to be published.
//!
//! A draft is a `.md` file directly inside `drafts.dir`, optionally starting
//! with a [frontmatter](crate::frontmatter) preamble. Publishing moves it to
//! `drafts.archive_dir` as `YYYY-MM-DD-<stem>.md`.

use crate::frontmatter::{self, Frontmatter};
use crate::naming;
use crate::types::{EntryDescriptor, normalize_tags};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("drafts directory not found: {0}")]
    MissingDir(PathBuf),
    #[error("draft not found: {0}")]
    NotFound(PathBuf),
    #[error("archive already exists: {0}")]
    ArchiveCollision(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub path: PathBuf,
    pub frontmatter: Frontmatter,
    /// Content after the preamble, trimmed. Still raw markdown.
    pub body: String,
}

impl Draft {
    /// Read and parse a draft file.
    pub fn read(path: &Path) -> Result<Self, DraftError> {
        let text = std::fs::read_to_string(path).map_err(|source| DraftError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let (frontmatter, body) = frontmatter::parse(&text);
        Ok(Self {
            path: path.to_path_buf(),
            frontmatter,
            body,
        })
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Preamble title, else the file stem as a title.
    pub fn title(&self) -> String {
        let fallback = naming::title_from_stem(&self.stem());
        naming::resolve(&[self.frontmatter.title(), Some(fallback.as_str())]).unwrap_or(fallback)
    }

    pub fn tags(&self) -> Vec<String> {
        normalize_tags(self.frontmatter.tags())
    }

    pub fn descriptor(&self) -> EntryDescriptor {
        EntryDescriptor::new(self.title(), self.body.clone(), self.tags())
    }
}

/// One row of a draft listing. Unreadable drafts are listed with their error.
#[derive(Debug)]
pub struct DraftListing {
    pub file_name: String,
    pub draft: Result<Draft, DraftError>,
}

/// All `*.md` files directly in `dir`, sorted by file name.
///
/// Symlinked drafts are followed. Entries that cannot be inspected, such as
/// dangling links, are logged and left out.
pub fn list_drafts(dir: &Path) -> Result<Vec<DraftListing>, DraftError> {
    if !dir.is_dir() {
        return Err(DraftError::MissingDir(dir.to_path_buf()));
    }

    let mut listings = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %dir.display(), %err, "skipping unreadable drafts entry");
                continue;
            }
        };
        let path = entry.path();
        let is_draft = entry.file_type().is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(naming::DRAFT_EXTENSION);
        if !is_draft {
            continue;
        }

        let draft = Draft::read(path);
        if let Err(err) = &draft {
            warn!(path = %path.display(), %err, "unreadable draft");
        }
        listings.push(DraftListing {
            file_name: entry.file_name().to_string_lossy().into_owned(),
            draft,
        });
    }
    debug!(dir = %dir.display(), count = listings.len(), "listed drafts");
    Ok(listings)
}

/// Load a draft by name; `.md` is appended when missing.
pub fn load_draft(dir: &Path, name: &str) -> Result<Draft, DraftError> {
    let path = dir.join(naming::draft_file_name(name));
    if !path.is_file() {
        return Err(DraftError::NotFound(path));
    }
    Draft::read(&path)
}

/// Where `stem` would be archived on `date`.
pub fn archive_path(archive_dir: &Path, date: NaiveDate, stem: &str) -> PathBuf {
    archive_dir.join(naming::archive_file_name(date, stem))
}

/// Fail with `ArchiveCollision` if the archive target is already taken.
pub fn check_archive(draft: &Draft, archive_dir: &Path, date: NaiveDate) -> Result<PathBuf, DraftError> {
    let target = archive_path(archive_dir, date, &draft.stem());
    if target.exists() {
        return Err(DraftError::ArchiveCollision(target));
    }
    Ok(target)
}

/// Move a draft into the archive directory. Never overwrites.
pub fn archive(draft: &Draft, archive_dir: &Path, date: NaiveDate) -> Result<PathBuf, DraftError> {
    let target = check_archive(draft, archive_dir, date)?;
    std::fs::create_dir_all(archive_dir)?;
    std::fs::rename(&draft.path, &target)?;
    debug!(from = %draft.path.display(), to = %target.display(), "archived draft");
    Ok(target)
}
