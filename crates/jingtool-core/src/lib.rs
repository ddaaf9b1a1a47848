//! Core types and traits for jingtool.
//!
//! This crate provides the data model shared by the listing, search and
//! batch-operation crates: directory entries, per-item outcomes, typed
//! errors and warnings, traversal configuration and path validation.

mod config;
mod entry;
mod error;
mod outcome;
mod path;

pub use config::{WalkConfig, WalkConfigBuilder};
pub use entry::{DirEntry, ListReport, SearchReport, SearchResult};
pub use error::{ErrorKind, FsError, PathWarning, WarningKind};
pub use outcome::{BatchSummary, OperationOutcome, OutcomeCollector, RenameRequest};
pub use path::{is_valid_path, validate_path};
