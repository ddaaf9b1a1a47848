//! Listing and search result types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PathWarning;

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirEntry {
    /// File name of the entry.
    pub name: String,
    /// Whether the entry itself is a directory (symlinks are not).
    pub is_directory: bool,
    /// Full path, the listed directory joined with `name`.
    pub path: PathBuf,
}

impl DirEntry {
    /// Create an entry for `name` inside `parent`.
    pub fn new(parent: &Path, name: impl Into<String>, is_directory: bool) -> Self {
        let name = name.into();
        Self {
            path: parent.join(&name),
            name,
            is_directory,
        }
    }
}

/// An entry whose name matched a search keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub path: PathBuf,
}

impl SearchResult {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Directory listing together with the errors it swallowed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListReport {
    /// Entries in name order. Empty when the directory could not be read.
    pub entries: Vec<DirEntry>,
    /// Problems encountered while reading.
    pub warnings: Vec<PathWarning>,
}

impl ListReport {
    /// Check whether any error was swallowed.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Recursive search results together with the errors it swallowed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchReport {
    /// Matches in discovery order.
    pub results: Vec<SearchResult>,
    /// Unreadable subtrees and skipped symlink loops.
    pub warnings: Vec<PathWarning>,
    /// True when traversal stopped early on cancellation.
    pub cancelled: bool,
}

impl SearchReport {
    /// Number of matches.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
