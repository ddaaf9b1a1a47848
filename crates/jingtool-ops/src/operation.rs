//! Request and response types for the named engine operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use jingtool_core::{DirEntry, OperationOutcome, RenameRequest, SearchResult};

/// One request to the engine, tagged by operation name.
///
/// ```json
/// { "op": "rename-file", "path": "/tmp/a.txt", "newName": "b.txt" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Request {
    /// Ask the folder picker for a directory.
    SelectFolder,
    /// List the immediate children of a directory.
    ReadDir { path: PathBuf },
    /// Rename a single file or directory.
    RenameFile { path: PathBuf, new_name: String },
    /// Rename several files independently.
    BatchRename { items: Vec<RenameRequest> },
    /// Search a directory tree by name substring.
    SearchFiles { root: PathBuf, keyword: String },
    /// Delete files and directories.
    DeleteFiles { paths: Vec<PathBuf> },
}

impl Request {
    /// The operation name used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectFolder => "select-folder",
            Self::ReadDir { .. } => "read-dir",
            Self::RenameFile { .. } => "rename-file",
            Self::BatchRename { .. } => "batch-rename",
            Self::SearchFiles { .. } => "search-files",
            Self::DeleteFiles { .. } => "delete-files",
        }
    }

    /// Whether this request mutates the filesystem.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::RenameFile { .. } | Self::BatchRename { .. } | Self::DeleteFiles { .. }
        )
    }
}

/// The engine's answer to a [`Request`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// `select-folder`: the chosen directory, or null when cancelled.
    Folder(Option<PathBuf>),
    /// `read-dir`.
    Entries(Vec<DirEntry>),
    /// `rename-file`.
    Outcome(OperationOutcome),
    /// `batch-rename` and `delete-files`.
    Outcomes(Vec<OperationOutcome>),
    /// `search-files`.
    Matches(Vec<SearchResult>),
}

/// The kind of batch operation, used for summaries and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Rename,
    Delete,
}

impl OperationType {
    /// Verb used in batch summaries.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Rename => "Renamed",
            Self::Delete => "Deleted",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rename => write!(f, "Rename"),
            Self::Delete => write!(f, "Delete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request: Request = serde_json::from_str(
            r#"{ "op": "rename-file", "path": "/tmp/a.txt", "newName": "b.txt" }"#,
        )
        .unwrap();
        assert_eq!(
            request,
            Request::RenameFile {
                path: PathBuf::from("/tmp/a.txt"),
                new_name: "b.txt".to_string(),
            }
        );
        assert_eq!(request.name(), "rename-file");
        assert!(request.is_destructive());

        let request: Request = serde_json::from_str(r#"{ "op": "select-folder" }"#).unwrap();
        assert_eq!(request, Request::SelectFolder);
        assert!(!request.is_destructive());
    }

    #[test]
    fn test_batch_rename_request() {
        let request: Request = serde_json::from_str(
            r#"{ "op": "batch-rename", "items": [ { "path": "/t/1.txt", "newName": "one.txt" } ] }"#,
        )
        .unwrap();
        let Request::BatchRename { items } = request else {
            panic!("expected batch-rename");
        };
        assert_eq!(items[0].new_name, "one.txt");
    }

    #[test]
    fn test_cancelled_folder_is_null() {
        let json = serde_json::to_string(&Response::Folder(None)).unwrap();
        assert_eq!(json, "null");
    }

    #[test]
    fn test_operation_type_display() {
        assert_eq!(OperationType::Rename.to_string(), "Rename");
        assert_eq!(OperationType::Delete.past_tense(), "Deleted");
    }
}
