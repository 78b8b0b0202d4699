//! # sitepost
//!
//! Treats a single hand-written HTML page as an append-only content store.
//! Posts are injected as `<article>` blocks right after a fixed anchor in
//! the page, recovered again by parsing the page, and republished as an RSS
//! feed. The page stays the source of truth; nothing else is persisted.
//!
//! # Architecture
//!
//! ```text
//! descriptor ─transform─▶ Entry ─encode─▶ fragment ─append─▶ index.html
//!                                                                │
//!                        feed.xml ◀─synthesize─ [DecodedEntry] ◀─scan/decode
//! ```
//!
//! Input sources (CLI arguments, console prompts, draft files, tracker
//! tasks) all produce an [`types::EntryDescriptor`]. From there the path is
//! the same: transform the body, stamp a timestamp, encode, append.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`site`] | Entry point: wires the modules together for one site root |
//! | [`codec`] | Entry ⇄ `<article>` fragment, the versioned fragment grammar |
//! | [`store`] | Host document read/append by anchor |
//! | [`transform`] | Markdown (or plain fallback) → display HTML, image styling |
//! | [`feed`] | RSS 2.0 synthesis from decoded posts |
//! | [`frontmatter`] | `---` preamble parser for drafts |
//! | [`drafts`] | Draft listing, loading and archiving |
//! | [`tracker`] | Post ideas as tasks in an external tracker (`bd`) |
//! | [`compose`] | Interactive post acquisition over any reader/writer |
//! | [`config`] | `sitepost.toml` loading, merging and validation |
//! | [`naming`] | Title, file name and slug conventions |
//! | [`types`] | Shared post types |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup for the binary |
//!
//! # Design Decisions
//!
//! ## The Page Is the Database
//!
//! There is no sidecar index. Listing and feed generation re-parse the page,
//! so hand edits to existing posts are picked up and nothing can drift out
//! of sync. The cost is that anything not encoded in the fragment (tags) is
//! not recoverable.
//!
//! ## Maud for Fragments
//!
//! Fragments are rendered with Maud, so titles and tags are escaped by
//! construction. Only the already-transformed body is inserted raw.
//!
//! ## Append, Never Rewrite
//!
//! The store only ever splices new text in after the anchor. Existing bytes
//! are never touched, which keeps diffs of the page reviewable.

pub mod codec;
pub mod compose;
pub mod config;
pub mod drafts;
pub mod feed;
pub mod frontmatter;
pub mod logging;
pub mod naming;
pub mod output;
pub mod site;
pub mod store;
pub mod tracker;
pub mod transform;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
