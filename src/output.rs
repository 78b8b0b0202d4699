//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Each command leads with what happened to which post (title, date, tags)
//! and shows filesystem paths as indented context lines, relative to the
//! site root where possible.
//!
//! ```text
//! Post created: Hello World
//!     Date: 2024-12-22::14:30
//!     Tags: ai
//!     Document: index.html
//!
//! Found 2 post(s):
//!
//!    1. [2024-12-22] Hello World
//!    2. [2024-11-02] Second Light
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and prints through [`print_lines`]. Format functions are pure:
//! no I/O, no side effects.

use crate::compose::PublishedTask;
use crate::drafts::DraftListing;
use crate::site::{FeedSummary, PublishedDraft};
use crate::tracker::WorkItem;
use crate::types::{DecodedEntry, Entry};
use std::path::Path;

/// How many posts `list` shows.
pub const LIST_LIMIT: usize = 10;

/// Titles longer than this are cut in listings.
pub const TITLE_WIDTH: usize = 50;

// ============================================================================
// Shared helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate to `max` characters, appending `...` if truncated.
fn truncate_title(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// `YYYY-MM-DD` prefix of a machine timestamp, or `unknown`.
fn list_date(timestamp: &str) -> &str {
    match timestamp.get(..10) {
        Some(date) => date,
        None if timestamp.is_empty() => "unknown",
        None => timestamp,
    }
}

fn tag_line(tags: &[String]) -> String {
    if tags.is_empty() {
        "none".to_string()
    } else {
        tags.join(", ")
    }
}

/// Path relative to `root` when it lives under it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Posts
// ============================================================================

pub fn format_banner(site_title: &str) -> Vec<String> {
    vec![format!("==> {site_title}")]
}

pub fn format_post_created(entry: &Entry, document: &Path, root: &Path) -> Vec<String> {
    vec![
        format!("Post created: {}", entry.title),
        format!("{}Date: {}", indent(1), entry.display_date()),
        format!("{}Tags: {}", indent(1), tag_line(&entry.tags)),
        format!("{}Document: {}", indent(1), display_path(document, root)),
    ]
}

/// Up to [`LIST_LIMIT`] posts, newest first.
pub fn format_post_list(posts: &[DecodedEntry]) -> Vec<String> {
    if posts.is_empty() {
        return vec!["No posts found.".to_string()];
    }
    let mut lines = vec![format!("Found {} post(s):", posts.len()), String::new()];
    for (i, post) in posts.iter().take(LIST_LIMIT).enumerate() {
        lines.push(format!(
            "   {}. [{}] {}",
            i + 1,
            list_date(&post.timestamp),
            truncate_title(&post.title, TITLE_WIDTH)
        ));
    }
    lines
}

// ============================================================================
// Feed
// ============================================================================

pub fn format_feed_summary(summary: &FeedSummary, root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Feed written: {}",
        display_path(&summary.path, root)
    )];
    if summary.total_posts == 0 {
        lines.push(format!(
            "{}No posts with a data-date attribute found; the feed is empty.",
            indent(1)
        ));
    } else {
        lines.push(format!(
            "{}{} of {} post(s) included",
            indent(1),
            summary.items,
            summary.total_posts
        ));
    }
    lines
}

// ============================================================================
// Drafts
// ============================================================================

/// `drafts` when the folder does not exist yet.
pub fn format_missing_drafts_dir(drafts_dir: &Path, root: &Path) -> Vec<String> {
    vec![
        format!("No drafts folder at {}", display_path(drafts_dir, root)),
        format!("{}Create it and add .md files to draft posts", indent(1)),
    ]
}

pub fn format_drafts(listings: &[DraftListing], drafts_dir: &Path, root: &Path) -> Vec<String> {
    if listings.is_empty() {
        return vec![
            format!("No drafts found in {}", display_path(drafts_dir, root)),
            format!("{}Publish one with: sitepost publish-draft <name>", indent(1)),
        ];
    }
    let mut lines = vec![format!("Drafts ({}):", listings.len()), String::new()];
    for (i, listing) in listings.iter().enumerate() {
        lines.push(format!("   {}. {}", i + 1, listing.file_name));
        match &listing.draft {
            Ok(draft) => {
                lines.push(format!("{}   Title: {}", indent(1), draft.title()));
                let tags = draft.tags();
                if !tags.is_empty() {
                    lines.push(format!("{}   Tags: {}", indent(1), tags.join(", ")));
                }
            }
            Err(err) => lines.push(format!("{}   Error: {}", indent(1), err)),
        }
    }
    lines
}

pub fn format_published_draft(published: &PublishedDraft, root: &Path) -> Vec<String> {
    vec![
        format!("Published draft: {}", published.entry.title),
        format!("{}Tags: {}", indent(1), tag_line(&published.entry.tags)),
        format!(
            "{}Archived to: {}",
            indent(1),
            display_path(&published.archived_to, root)
        ),
    ]
}

// ============================================================================
// Tracker
// ============================================================================

pub fn format_ready_tasks(items: &[WorkItem]) -> Vec<String> {
    if items.is_empty() {
        return vec![
            "No ready tasks. Create one with:".to_string(),
            format!("{}sitepost idea 'Post title'", indent(1)),
        ];
    }
    let mut lines = vec![
        format!("Ready to write ({} tasks):", items.len()),
        String::new(),
    ];
    for (i, item) in items.iter().enumerate() {
        lines.push(format!(
            "   {}. [{}] (P{}) {}",
            i + 1,
            item.id,
            item.priority,
            item.title
        ));
    }
    lines
}

pub fn format_idea_created(id: &str, title: &str, priority: u8) -> Vec<String> {
    vec![
        format!("Idea created: {title}"),
        format!("{}Task: {id} (P{priority})", indent(1)),
    ]
}

/// `idea` when the tracker could not be reached.
pub fn format_idea_failed(title: &str) -> Vec<String> {
    vec![
        format!("Could not create idea (tracker unavailable): {title}"),
        format!("{}Install bd or set tracker.program in sitepost.toml", indent(1)),
    ]
}

pub fn format_task_published(published: &PublishedTask, root: &Path) -> Vec<String> {
    let mut lines = vec![format!("Published task {}: {}", published.task_id, published.entry.title)];
    if published.closed {
        lines.push(format!("{}Closed task {}", indent(1), published.task_id));
    } else {
        lines.push(format!(
            "{}Task {} left open (tracker close failed)",
            indent(1),
            published.task_id
        ));
    }
    lines.extend(format_feed_summary(&published.feed, root));
    lines
}

/// Reminder printed after anything that changed the site.
pub fn format_deploy_hint() -> Vec<String> {
    vec![
        String::new(),
        "Ready to deploy:".to_string(),
        format!("{}git add . && git commit -m 'New post' && git push", indent(1)),
    ]
}
