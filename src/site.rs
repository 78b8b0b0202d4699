//! One site on disk: host document, feed, drafts and archive under a root.
//!
//! `Site` is the only type the CLI talks to. It owns the resolved
//! configuration and the transform chosen at startup, and wires the store,
//! codec, feed and drafts modules together.

use crate::codec;
use crate::config::{ConfigError, SiteConfig};
use crate::drafts::{self, DraftError, DraftListing};
use crate::feed::{self, FeedContext, FeedError};
use crate::store::{DocumentStore, StoreError};
use crate::transform::{Capability, TextTransform, select_transform};
use crate::types::{DecodedEntry, Entry, EntryDescriptor};
use chrono::{DateTime, FixedOffset, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error("post title must not be empty")]
    EmptyTitle,
}

/// Result of a feed rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSummary {
    pub path: PathBuf,
    /// Items written to the feed.
    pub items: usize,
    /// Posts found in the host document.
    pub total_posts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedDraft {
    pub entry: Entry,
    pub archived_to: PathBuf,
}

pub struct Site {
    root: PathBuf,
    config: SiteConfig,
    store: DocumentStore,
    transform: Box<dyn TextTransform>,
    capability: Capability,
}

impl Site {
    /// Validate `config` and pick the content transform.
    pub fn open(root: &Path, config: SiteConfig) -> Result<Self, SiteError> {
        config.validate()?;
        let (transform, capability) = select_transform(&config.markdown);
        match capability {
            Capability::Unavailable if config.markdown.enabled => {
                warn!("markdown support not built in; posts are rendered as plain paragraphs")
            }
            Capability::Unavailable => debug!("markdown disabled in config"),
            Capability::Rich => {}
        }
        Ok(Self::with_transform(root, config, transform, capability))
    }

    /// Build a site around an explicit transform. `config` is not validated.
    pub fn with_transform(
        root: &Path,
        config: SiteConfig,
        transform: Box<dyn TextTransform>,
        capability: Capability,
    ) -> Self {
        let store = DocumentStore::new(root.join(&config.store.document), config.store.anchor.clone());
        Self {
            root: root.to_path_buf(),
            config,
            store,
            transform,
            capability,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn document_path(&self) -> &Path {
        self.store.path()
    }

    pub fn feed_path(&self) -> PathBuf {
        self.root.join(&self.config.feed.path)
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.root.join(&self.config.drafts.dir)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.root.join(&self.config.drafts.archive_dir)
    }

    /// Transform, encode and append one post stamped with `now`.
    pub fn create_post(
        &self,
        descriptor: &EntryDescriptor,
        now: DateTime<FixedOffset>,
    ) -> Result<Entry, SiteError> {
        let title = descriptor.title.trim();
        if title.is_empty() {
            return Err(SiteError::EmptyTitle);
        }
        let body = self.transform.transform(&descriptor.raw_body);
        let entry = Entry::new(title, now, body, &descriptor.tags);

        self.store.append(&codec::encode(&entry))?;
        info!(title = %entry.title, tags = entry.tags.len(), "post created");
        Ok(entry)
    }

    /// Posts in the host document, newest first.
    pub fn posts(&self) -> Result<Vec<DecodedEntry>, SiteError> {
        Ok(self.store.scan()?)
    }

    /// Rebuild the feed file from the host document.
    pub fn regenerate_feed(&self, now: DateTime<Utc>) -> Result<FeedSummary, SiteError> {
        let posts = self.posts()?;
        let feed = feed::synthesize(&posts, &FeedContext::from_config(&self.config), now);
        let path = self.feed_path();
        feed::write_feed(&path, &feed)?;
        info!(path = %path.display(), items = feed.items.len(), "feed written");
        Ok(FeedSummary {
            path,
            items: feed.items.len(),
            total_posts: posts.len(),
        })
    }

    pub fn drafts(&self) -> Result<Vec<DraftListing>, SiteError> {
        Ok(drafts::list_drafts(&self.drafts_dir())?)
    }

    /// Publish a draft and move it to the archive.
    ///
    /// An occupied archive slot is reported before the host document is
    /// touched. The draft is only moved once the post has been appended.
    pub fn publish_draft(
        &self,
        name: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<PublishedDraft, SiteError> {
        let draft = drafts::load_draft(&self.drafts_dir(), name)?;
        let archive_dir = self.archive_dir();
        let date = now.date_naive();
        drafts::check_archive(&draft, &archive_dir, date)?;

        let entry = self.create_post(&draft.descriptor(), now)?;
        let archived_to = drafts::archive(&draft, &archive_dir, date)?;
        Ok(PublishedDraft { entry, archived_to })
    }
}
