//! Visited-directory tracking for symlink loop detection.

use std::path::{Path, PathBuf};

use dashmap::DashSet;

/// Identity of a directory independent of the path used to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DirKey {
    /// Device and inode number (Unix).
    Inode { device: u64, inode: u64 },
    /// Fully resolved path, where inode numbers are unavailable.
    Canonical(PathBuf),
}

impl DirKey {
    /// Resolve the identity of `path`, following symlinks.
    ///
    /// Returns `None` when the target cannot be stat'ed.
    #[cfg(unix)]
    pub fn of(path: &Path) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;

        let metadata = std::fs::metadata(path).ok()?;
        Some(Self::Inode {
            device: metadata.dev(),
            inode: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    pub fn of(path: &Path) -> Option<Self> {
        path.canonicalize().ok().map(Self::Canonical)
    }
}

/// Tracks directories already descended into.
///
/// The walker may call into this from several threads, so it is backed by
/// a concurrent set.
#[derive(Debug, Default)]
pub struct InodeTracker {
    seen: DashSet<DirKey>,
}

impl InodeTracker {
    /// Create a new tracker.
    pub fn new() -> Self {
        Self {
            seen: DashSet::new(),
        }
    }

    /// Track a directory. Returns `true` if this is the first time seeing it.
    pub fn track(&self, key: DirKey) -> bool {
        self.seen.insert(key)
    }

    /// Check if a directory has been seen (without tracking).
    pub fn has_seen(&self, key: &DirKey) -> bool {
        self.seen.contains(key)
    }

    /// Number of distinct directories tracked.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
