//! Post ideas tracked as tasks in an external issue tracker.
//!
//! The default backend shells out to `bd` (beads) with `--json` and parses
//! its output. Calls are synchronous with no timeout. A tracker that cannot
//! be started is reported as [`TrackerError::Unavailable`]; callers treat
//! that as a soft failure and carry on without it.

use serde::Deserialize;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Title prefix for tasks created by [`TaskTracker::create`].
pub const TASK_PREFIX: &str = "Write post:";

/// Close reason recorded when a task's post goes live.
pub const PUBLISHED_REASON: &str = "Published to site";

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("task tracker `{program}` unavailable: {source}")]
    Unavailable {
        program: String,
        source: std::io::Error,
    },
    #[error("task tracker failed: {stderr}")]
    Failed { stderr: String },
    #[error("unexpected task tracker output: {0}")]
    Json(#[from] serde_json::Error),
}

/// One ready task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkItem {
    #[serde(default = "default_id")]
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_priority")]
    pub priority: u8,
}

fn default_id() -> String {
    "unknown".to_string()
}

fn default_title() -> String {
    "Untitled".to_string()
}

fn default_priority() -> u8 {
    2
}

impl WorkItem {
    /// Post title for this task, without the `Write post:` prefix.
    pub fn post_title(&self) -> String {
        strip_task_prefix(&self.title).to_string()
    }
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

pub trait TaskTracker {
    /// Unblocked tasks, in tracker order.
    fn ready(&self) -> Result<Vec<WorkItem>, TrackerError>;
    /// Create a `Write post: <title>` task and return its id.
    fn create(&self, title: &str, priority: u8) -> Result<String, TrackerError>;
    fn close(&self, id: &str, reason: &str) -> Result<(), TrackerError>;
}

/// The `bd` command-line tracker.
#[derive(Debug, Clone)]
pub struct BeadsTracker {
    program: String,
}

impl BeadsTracker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, TrackerError> {
        debug!(program = %self.program, ?args, "running task tracker");
        let output = Command::new(&self.program)
            .args(args)
            .arg("--json")
            .output()
            .map_err(|source| TrackerError::Unavailable {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(TrackerError::Failed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TaskTracker for BeadsTracker {
    fn ready(&self) -> Result<Vec<WorkItem>, TrackerError> {
        parse_ready(&self.run(&["ready"])?)
    }

    fn create(&self, title: &str, priority: u8) -> Result<String, TrackerError> {
        let task = format!("{TASK_PREFIX} {title}");
        let priority = priority.to_string();
        parse_created(&self.run(&["create", &task, "-t", "task", "-p", &priority])?)
    }

    fn close(&self, id: &str, reason: &str) -> Result<(), TrackerError> {
        self.run(&["close", id, "--reason", reason]).map(|_| ())
    }
}

fn parse_ready(stdout: &str) -> Result<Vec<WorkItem>, TrackerError> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(stdout)?)
}

fn parse_created(stdout: &str) -> Result<String, TrackerError> {
    let created: Created = serde_json::from_str(stdout)?;
    Ok(created.id)
}

/// Strip a leading `Write post:` (any case) and surrounding whitespace.
pub fn strip_task_prefix(title: &str) -> &str {
    let prefix_len = TASK_PREFIX.len();
    match title.get(..prefix_len) {
        Some(head) if head.eq_ignore_ascii_case(TASK_PREFIX) => title[prefix_len..].trim(),
        _ => title,
    }
}
