//! Permanent deletion of files and directories.
//!
//! Deletion is immediate and irreversible: there is no trash, no dry run
//! and no confirmation at this layer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use jingtool_core::{FsError, OperationOutcome, OutcomeCollector, validate_path};

use crate::operation::OperationType;

/// Delete one path.
///
/// Directories are removed with all their contents; entries that vanish
/// while the tree is being removed are not an error. Files and symlinks are
/// unlinked (a symlink's target is left alone). A path that does not exist
/// when deletion starts is reported as [`FsError::NotFound`].
pub fn delete_one(path: &Path) -> Result<(), FsError> {
    validate_path(path)?;

    let metadata = fs::symlink_metadata(path).map_err(|e| FsError::io(path, e))?;

    if metadata.is_dir() {
        debug!(path = %path.display(), "removing directory tree");
        match fs::remove_dir_all(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(FsError::io(path, e)),
            _ => Ok(()),
        }
    } else {
        debug!(path = %path.display(), "removing file");
        fs::remove_file(path).map_err(|e| FsError::io(path, e))
    }
}

/// Delete each path independently, in order.
///
/// Returns exactly one outcome per input path. Once `cancel` fires, every
/// path not yet started is reported as cancelled and left on disk.
pub fn delete_many(paths: &[PathBuf], cancel: &CancellationToken) -> Vec<OperationOutcome> {
    let mut collector = OutcomeCollector::with_capacity(paths.len());

    for (i, path) in paths.iter().enumerate() {
        if cancel.is_cancelled() {
            debug!(remaining = paths.len() - i, "batch delete cancelled");
            collector.fill_cancelled(paths[i..].iter().cloned());
            break;
        }

        let result = delete_one(path);
        if let Err(e) = &result {
            warn!(path = %path.display(), error = %e, "delete failed");
        }
        collector.record(path, result);
    }

    let summary = collector.summary();
    info!(
        operation = %OperationType::Delete,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "{}",
        summary.describe(OperationType::Delete.past_tense())
    );
    collector.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jingtool_core::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_delete_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "bye").unwrap();

        assert!(delete_one(&file).is_ok());
        assert!(!file.exists());
    }

    #[test]
    fn test_delete_directory_tree() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir_all(dir.join("a/b/c")).unwrap();
        fs::write(dir.join("a/b/c/deep.txt"), "").unwrap();
        fs::write(dir.join("top.txt"), "").unwrap();

        assert!(delete_one(&dir).is_ok());
        assert!(!dir.exists());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = delete_one(&temp.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_relative_path_is_rejected() {
        let err = delete_one(Path::new("relative/file.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_symlink_keeps_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "").unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(delete_one(&link).is_ok());
        assert!(fs::symlink_metadata(&link).is_err());
        assert!(target.join("keep.txt").exists());
    }

    #[test]
    fn test_delete_many_cancelled_midway() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcomes = delete_many(&[a.clone(), b.clone()], &cancel);

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.kind == Some(ErrorKind::Cancelled)));
        assert!(a.exists());
        assert!(b.exists());
    }
}
