//! Directory listing and recursive name search for jingtool.
//!
//! # Overview
//!
//! `jingtool-scan` reads the filesystem on behalf of the file browser:
//!
//! - **Listing** of the immediate children of one directory
//! - **Recursive search** for entries whose name contains a keyword
//! - **Fail-soft** reads: unreadable nodes yield no entries plus a warning
//! - **Cancellation** between traversal steps via [`CancellationToken`]
//! - **Symlink-loop guard** when links are followed
//!
//! # Example
//!
//! ```rust,no_run
//! use jingtool_scan::{list_dir, Searcher};
//! use std::path::Path;
//!
//! for entry in list_dir(Path::new("/tmp")) {
//!     println!("{} (dir: {})", entry.name, entry.is_directory);
//! }
//!
//! let searcher = Searcher::new();
//! for hit in searcher.search(Path::new("/tmp"), "log") {
//!     println!("{}", hit.path.display());
//! }
//! ```

mod inode;
mod lister;
mod progress;
mod searcher;

pub use inode::{DirKey, InodeTracker};
pub use lister::{Lister, list_dir, list_dir_report};
pub use progress::SearchProgress;
pub use searcher::Searcher;

pub use tokio_util::sync::CancellationToken;

// Re-export core types for convenience
pub use jingtool_core::{
    DirEntry, ListReport, PathWarning, SearchReport, SearchResult, WalkConfig, WarningKind,
};
