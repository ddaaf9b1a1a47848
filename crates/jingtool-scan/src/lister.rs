//! Single-level directory listing.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use jingtool_core::{DirEntry, ListReport, PathWarning, WalkConfig, WarningKind};

/// Lists the immediate children of a directory.
#[derive(Debug, Clone, Default)]
pub struct Lister {
    config: WalkConfig,
}

impl Lister {
    /// Create a lister that includes every entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a lister with a custom configuration.
    pub fn with_config(config: WalkConfig) -> Self {
        Self { config }
    }

    /// List `path`, returning an empty vector on any error.
    pub fn list(&self, path: &Path) -> Vec<DirEntry> {
        self.list_report(path).entries
    }

    /// List `path`, keeping the errors that [`Lister::list`] swallows.
    pub fn list_report(&self, path: &Path) -> ListReport {
        debug!(path = %path.display(), "listing directory");

        let mut report = ListReport::default();
        let read_dir = match fs::read_dir(path) {
            Ok(rd) => rd,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read directory");
                report.warnings.push(PathWarning::read_error(path, &err));
                return report;
            }
        };

        for entry_result in read_dir {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    report.warnings.push(PathWarning::read_error(path, &err));
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            if self.config.should_skip_hidden(&name) {
                continue;
            }

            // file_type does not follow symlinks
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(err) => {
                    report.warnings.push(PathWarning::new(
                        entry.path(),
                        err.to_string(),
                        WarningKind::MetadataError,
                    ));
                    continue;
                }
            };

            report
                .entries
                .push(DirEntry::new(path, name, file_type.is_dir()));
        }

        report.entries.sort_by(|a, b| a.name.cmp(&b.name));
        report
    }
}

/// List the immediate children of `path`.
///
/// Missing, unreadable and non-directory paths all yield an empty vector.
pub fn list_dir(path: &Path) -> Vec<DirEntry> {
    Lister::new().list(path)
}

/// List the immediate children of `path` with the warning side channel.
pub fn list_dir_report(path: &Path) -> ListReport {
    Lister::new().list_report(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/nested.txt"), "nested").unwrap();
        fs::write(root.join(".hidden"), "").unwrap();

        temp
    }

    #[test]
    fn test_lists_immediate_children_only() {
        let temp = create_test_dir();
        let entries = list_dir(temp.path());

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![".hidden", "file1.txt", "subdir"]);

        let subdir = entries.iter().find(|e| e.name == "subdir").unwrap();
        assert!(subdir.is_directory);
        assert_eq!(subdir.path, temp.path().join("subdir"));

        let file = entries.iter().find(|e| e.name == "file1.txt").unwrap();
        assert!(!file.is_directory);
    }

    #[test]
    fn test_hidden_entries_can_be_skipped() {
        let temp = create_test_dir();
        let config = WalkConfig::builder().include_hidden(false).build().unwrap();
        let entries = Lister::with_config(config).list(temp.path());

        assert!(entries.iter().all(|e| !e.name.starts_with('.')));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nonexistent");

        assert!(list_dir(&missing).is_empty());

        let report = list_dir_report(&missing);
        assert!(report.entries.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, WarningKind::NotFound);
    }

    #[test]
    fn test_file_path_is_empty() {
        let temp = create_test_dir();
        let report = list_dir_report(&temp.path().join("file1.txt"));

        assert!(report.entries.is_empty());
        assert!(report.has_warnings());
    }

    #[test]
    fn test_empty_directory_has_no_warnings() {
        let temp = TempDir::new().unwrap();
        let report = list_dir_report(temp.path());

        assert!(report.entries.is_empty());
        assert!(!report.has_warnings());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_directory_is_not_a_directory() {
        let temp = create_test_dir();
        std::os::unix::fs::symlink(temp.path().join("subdir"), temp.path().join("link"))
            .unwrap();

        let entries = list_dir(temp.path());
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert!(!link.is_directory);
    }
}
