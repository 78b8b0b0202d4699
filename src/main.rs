use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use sitepost::compose;
use sitepost::config::{self, SiteConfig};
use sitepost::drafts::DraftError;
use sitepost::logging;
use sitepost::output::{self, print_lines};
use sitepost::site::{Site, SiteError};
use sitepost::tracker::{BeadsTracker, TaskTracker, TrackerError};
use sitepost::types::{EntryDescriptor, parse_tag_list};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(name = "sitepost")]
#[command(about = "Append posts to a single-page HTML site and derive its RSS feed")]
#[command(long_about = "\
Append posts to a single-page HTML site and derive its RSS feed

The page is the database. New posts are inserted right after a fixed anchor
element, so the page reads newest-first; listing and the RSS feed are rebuilt
by parsing the page again.

Site layout:

  site/
  ├── sitepost.toml        # Optional config (run 'sitepost gen-config')
  ├── index.html           # Host page, must contain the anchor element
  ├── feed.xml             # Generated by 'sitepost rss'
  ├── drafts/              # Markdown drafts with optional --- preamble
  │   └── local-llms.md
  └── posts/               # Published drafts, archived as YYYY-MM-DD-name.md

Post ideas can be tracked as tasks in bd ('idea', 'ready', 'publish').")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file [default: <root>/sitepost.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new post
    Post {
        /// Post title
        title: String,
        /// Post content (Markdown supported)
        content: String,
        /// Comma-separated tags
        #[arg(short, long, default_value = "")]
        tags: String,
    },
    /// Regenerate the RSS feed from the page
    Rss,
    /// List recent posts
    List {
        /// Print every post as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Create a post idea as a tracker task
    Idea {
        /// Post idea or topic
        title: String,
        /// Priority 0-4
        #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=4))]
        priority: u8,
    },
    /// List ready post ideas from the tracker
    Ready,
    /// Interactive: pick a task, write the post, close the task
    Publish,
    /// List drafts
    Drafts,
    /// Publish a draft and archive it
    PublishDraft {
        /// Draft file name, `.md` optional
        name: String,
    },
    /// Print a stock sitepost.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let command = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        command => command,
    };

    let site_config = load_site_config(&cli.root, cli.config.as_deref())?;
    let tracker = BeadsTracker::new(site_config.tracker.program.clone());
    let site = Site::open(&cli.root, site_config)?;
    let root = site.root().to_path_buf();

    match command {
        Command::Post {
            title,
            content,
            tags,
        } => {
            let descriptor = EntryDescriptor::new(title, content, parse_tag_list(&tags));
            let entry = site.create_post(&descriptor, Local::now().fixed_offset())?;
            print_lines(&output::format_post_created(&entry, site.document_path(), &root));
            println!("\nRun 'sitepost rss' to update the feed.");
        }
        Command::Rss => {
            let summary = site.regenerate_feed(Utc::now())?;
            print_lines(&output::format_feed_summary(&summary, &root));
        }
        Command::List { json } => {
            let posts = site.posts()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
            } else {
                print_lines(&output::format_post_list(&posts));
            }
        }
        Command::Idea { title, priority } => match tracker.create(&title, priority) {
            Ok(id) => print_lines(&output::format_idea_created(&id, &title, priority)),
            Err(err @ TrackerError::Unavailable { .. }) => {
                warn!(%err, "could not create idea");
                print_lines(&output::format_idea_failed(&title));
            }
            Err(err) => return Err(err.into()),
        },
        Command::Ready => {
            let items = tracker.ready().unwrap_or_else(|err| {
                warn!(%err, "could not list ready tasks");
                Vec::new()
            });
            print_lines(&output::format_ready_tasks(&items));
        }
        Command::Publish => {
            print_lines(&output::format_banner(&site.config().site.title));
            let stdin = std::io::stdin();
            let published = compose::publish_task(
                &site,
                &tracker,
                &mut stdin.lock(),
                &mut std::io::stdout(),
                Local::now().fixed_offset(),
            )?;
            if let Some(published) = published {
                print_lines(&output::format_task_published(&published, &root));
                print_lines(&output::format_deploy_hint());
            }
        }
        Command::Drafts => match site.drafts() {
            Ok(listings) => {
                print_lines(&output::format_drafts(&listings, &site.drafts_dir(), &root))
            }
            Err(SiteError::Draft(DraftError::MissingDir(dir))) => {
                print_lines(&output::format_missing_drafts_dir(&dir, &root))
            }
            Err(err) => return Err(err.into()),
        },
        Command::PublishDraft { name } => {
            let published = site.publish_draft(&name, Local::now().fixed_offset())?;
            print_lines(&output::format_published_draft(&published, &root));
            let summary = site.regenerate_feed(Utc::now())?;
            print_lines(&output::format_feed_summary(&summary, &root));
            print_lines(&output::format_deploy_hint());
        }
        Command::GenConfig => unreachable!("gen-config returns before the site is opened"),
    }

    Ok(())
}

/// `--config` if given (must exist), else `<root>/sitepost.toml` when present, else defaults.
fn load_site_config(root: &Path, explicit: Option<&Path>) -> Result<SiteConfig, config::ConfigError> {
    match explicit {
        Some(path) => config::load_explicit_config(path),
        None => config::load_config(root),
    }
}
