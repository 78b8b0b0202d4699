//! Interactive acquisition of posts from a reader/writer pair.
//!
//! Everything here is generic over `BufRead` + `Write`, so the console,
//! piped input and tests all go through the same code.

use crate::site::{FeedSummary, Site, SiteError};
use crate::tracker::{PUBLISHED_REASON, TaskTracker, WorkItem};
use crate::types::{Entry, EntryDescriptor, parse_tag_list};
use chrono::{DateTime, FixedOffset, Utc};
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Outcome of [`publish_task`] when a post was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedTask {
    pub task_id: String,
    pub entry: Entry,
    /// Whether the tracker accepted the close.
    pub closed: bool,
    pub feed: FeedSummary,
}

/// Read one line without its terminator. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// Show a numbered menu and return the chosen task.
///
/// `0`, an empty answer or end of input cancels. Anything that is not a
/// listed number cancels with a message.
pub fn select_task<'a, R: BufRead, W: Write>(
    items: &'a [WorkItem],
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<&'a WorkItem>> {
    writeln!(output, "\nReady tasks ({}):\n", items.len())?;
    for (i, item) in items.iter().enumerate() {
        writeln!(output, "   {}. [{}] {}", i + 1, item.id, item.title)?;
    }
    writeln!(output, "\n   0. Cancel")?;
    write!(output, "\nSelect task number: ")?;
    output.flush()?;

    let answer = read_line(input)?.unwrap_or_default();
    let answer = answer.trim();
    if answer.is_empty() || answer == "0" {
        writeln!(output, "Cancelled.")?;
        return Ok(None);
    }

    match answer.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
        Some(index) if index < items.len() => Ok(Some(&items[index])),
        Some(_) => {
            writeln!(output, "Invalid selection.")?;
            Ok(None)
        }
        None => {
            writeln!(output, "Cancelled.")?;
            Ok(None)
        }
    }
}

/// Read a post body (until the first empty line) and a tag line.
///
/// An empty body cancels.
pub fn read_descriptor<R: BufRead, W: Write>(
    title: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<EntryDescriptor>> {
    writeln!(output, "\nWriting post: {title}")?;
    writeln!(
        output,
        "   Enter content (Markdown supported). End with an empty line:\n"
    )?;
    output.flush()?;

    let mut lines = Vec::new();
    while let Some(line) = read_line(input)? {
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }
    let body = lines.join("\n");
    if body.trim().is_empty() {
        writeln!(output, "No content provided. Cancelled.")?;
        return Ok(None);
    }

    write!(output, "\nTags (comma-separated, or Enter to skip): ")?;
    output.flush()?;
    let tags = read_line(input)?
        .map(|line| parse_tag_list(&line))
        .unwrap_or_default();

    Ok(Some(EntryDescriptor::new(title, body, tags)))
}

/// Pick a ready task, write its post, close the task and rebuild the feed.
///
/// Tracker failures degrade: an unreachable tracker means no ready tasks,
/// and a failed close still counts as published. `Ok(None)` means the user
/// cancelled or there was nothing to pick.
pub fn publish_task<T, R, W>(
    site: &Site,
    tracker: &T,
    input: &mut R,
    output: &mut W,
    now: DateTime<FixedOffset>,
) -> Result<Option<PublishedTask>, SiteError>
where
    T: TaskTracker + ?Sized,
    R: BufRead,
    W: Write,
{
    let items = tracker.ready().unwrap_or_else(|err| {
        warn!(%err, "could not list ready tasks");
        Vec::new()
    });
    if items.is_empty() {
        writeln!(output, "No ready tasks to publish.")?;
        return Ok(None);
    }

    let Some(task) = select_task(&items, input, output)? else {
        return Ok(None);
    };
    let Some(descriptor) = read_descriptor(&task.post_title(), input, output)? else {
        return Ok(None);
    };

    let entry = site.create_post(&descriptor, now)?;
    let closed = match tracker.close(&task.id, PUBLISHED_REASON) {
        Ok(()) => true,
        Err(err) => {
            warn!(task = %task.id, %err, "could not close task");
            false
        }
    };
    let feed = site.regenerate_feed(now.with_timezone(&Utc))?;

    Ok(Some(PublishedTask {
        task_id: task.id.clone(),
        entry,
        closed,
        feed,
    }))
}
