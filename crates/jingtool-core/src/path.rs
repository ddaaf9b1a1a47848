//! Path validation performed before any filesystem mutation.

use std::path::Path;

use crate::error::FsError;

/// Check whether a path may be handed to a mutating operation.
///
/// A path is valid when it is non-empty and absolute by the rules of the
/// host platform. Existence is not checked.
pub fn is_valid_path(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    !path.as_os_str().is_empty() && path.is_absolute()
}

/// Like [`is_valid_path`], returning [`FsError::InvalidPath`] on rejection.
pub fn validate_path(path: impl AsRef<Path>) -> Result<(), FsError> {
    let path = path.as_ref();
    if is_valid_path(path) {
        Ok(())
    } else {
        Err(FsError::InvalidPath {
            path: path.to_path_buf(),
        })
    }
}
