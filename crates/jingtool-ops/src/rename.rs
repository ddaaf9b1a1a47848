//! Rename operations.

use std::fs;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use jingtool_core::{
    FsError, OperationOutcome, OutcomeCollector, RenameRequest, validate_path,
};

use crate::operation::OperationType;

/// Rename `path` to `new_name` within its parent directory.
///
/// Relative or empty paths are rejected before the filesystem is touched.
pub fn rename_one(path: &Path, new_name: &str) -> OperationOutcome {
    let result = try_rename(path, new_name);
    if let Err(e) = &result {
        warn!(path = %path.display(), error = %e, "rename failed");
    }
    OperationOutcome::from_result(path, result)
}

/// Rename each item independently, in order.
///
/// One failed item never stops the rest. Once `cancel` fires, every item
/// not yet started is reported as cancelled.
pub fn rename_batch(items: &[RenameRequest], cancel: &CancellationToken) -> Vec<OperationOutcome> {
    let mut collector = OutcomeCollector::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        if cancel.is_cancelled() {
            debug!(remaining = items.len() - i, "batch rename cancelled");
            collector.fill_cancelled(items[i..].iter().map(|r| r.path.clone()));
            break;
        }

        collector.push(rename_one(&item.path, &item.new_name));
    }

    let summary = collector.summary();
    info!(
        operation = %OperationType::Rename,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "{}",
        summary.describe(OperationType::Rename.past_tense())
    );
    collector.finish()
}

/// Destination of renaming `path` to `new_name`.
pub fn rename_destination(path: &Path, new_name: &str) -> Option<PathBuf> {
    path.parent().map(|parent| parent.join(new_name))
}

fn try_rename(path: &Path, new_name: &str) -> Result<(), FsError> {
    validate_path(path)?;
    validate_filename(new_name).map_err(|reason| FsError::invalid_name(new_name, reason))?;

    // The filesystem root has no parent to rename within.
    let destination = rename_destination(path, new_name).ok_or_else(|| FsError::InvalidPath {
        path: path.to_path_buf(),
    })?;

    debug!(from = %path.display(), to = %destination.display(), "renaming");
    fs::rename(path, &destination).map_err(|e| FsError::io(path, e))
}

/// Validate that `name` is a bare file name.
pub fn validate_filename(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }

    if name.len() > 255 {
        return Err("Name is too long (max 255 bytes)".into());
    }

    let invalid_chars = ['/', '\0'];
    for c in invalid_chars {
        if name.contains(c) {
            return Err(format!("Name cannot contain '{}'", c.escape_default()));
        }
    }

    #[cfg(target_os = "windows")]
    {
        let windows_invalid = ['\\', ':', '*', '?', '"', '<', '>', '|'];
        for c in windows_invalid {
            if name.contains(c) {
                return Err(format!("Name cannot contain '{}'", c));
            }
        }

        let reserved = [
            "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
            "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
        ];
        let upper_name = name.to_uppercase();
        let base_name = upper_name.split('.').next().unwrap_or("");
        if reserved.contains(&base_name) {
            return Err("Reserved filename".into());
        }

        if name.ends_with(' ') || name.ends_with('.') {
            return Err("Name cannot end with a space or a dot".into());
        }
    }

    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names".into());
    }

    Ok(())
}
