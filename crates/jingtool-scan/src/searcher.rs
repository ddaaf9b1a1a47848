//! Recursive name search built on jwalk.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use jingtool_core::{PathWarning, SearchReport, SearchResult, WalkConfig, WarningKind};

use crate::inode::{DirKey, InodeTracker};
use crate::progress::SearchProgress;

/// Depth-first search for entries whose name contains a keyword.
///
/// Every directory below the root is descended into, whether or not its own
/// name matched. Unreadable subtrees are skipped and recorded as warnings.
pub struct Searcher {
    config: WalkConfig,
    progress_tx: broadcast::Sender<SearchProgress>,
}

impl Searcher {
    /// Create a searcher with the default configuration.
    pub fn new() -> Self {
        Self::with_config(WalkConfig::default())
    }

    /// Create a searcher with a custom configuration.
    pub fn with_config(config: WalkConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            config,
            progress_tx,
        }
    }

    /// Subscribe to search progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<SearchProgress> {
        self.progress_tx.subscribe()
    }

    /// The configuration this searcher walks with.
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Search below `root` for names containing `keyword`.
    pub fn search(&self, root: &Path, keyword: &str) -> Vec<SearchResult> {
        self.search_report(root, keyword, &CancellationToken::new())
            .results
    }

    /// Search below `root`, keeping warnings and stopping early once
    /// `cancel` fires.
    pub fn search_report(
        &self,
        root: &Path,
        keyword: &str,
        cancel: &CancellationToken,
    ) -> SearchReport {
        let start = Instant::now();
        debug!(root = %root.display(), keyword, "starting search");

        let mut report = SearchReport::default();
        let loops: Arc<Mutex<Vec<PathBuf>>> = Arc::default();
        let mut visited: u64 = 0;

        for entry_result in self.walker(root, Arc::clone(&loops)) {
            if cancel.is_cancelled() {
                debug!(visited, "search cancelled");
                report.cancelled = true;
                break;
            }

            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    push_warning(&mut report.warnings, warning_from(&err, root));
                    continue;
                }
            };

            visited += 1;
            if let Some(err) = entry.read_children_error.as_ref() {
                push_warning(&mut report.warnings, warning_from(err, &entry.path()));
            }
            let name = entry.file_name().to_string_lossy();
            if name.contains(keyword) {
                report
                    .results
                    .push(SearchResult::new(name.to_string(), entry.path()));
            }

            if visited % self.config.progress_every() == 0 {
                let _ = self.progress_tx.send(SearchProgress {
                    entries_visited: visited,
                    matches: report.results.len() as u64,
                    warnings: report.warnings.len() as u64,
                    current_path: entry.path(),
                    elapsed: start.elapsed(),
                });
            }
        }

        if let Ok(mut loops) = loops.lock() {
            report
                .warnings
                .extend(loops.drain(..).map(PathWarning::symlink_loop));
        }

        debug!(
            matches = report.results.len(),
            warnings = report.warnings.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search finished"
        );
        report
    }

    /// Build the walker for `root`.
    ///
    /// When links are followed, directories already descended into are not
    /// read again; the paths cut off this way are pushed onto `loops`.
    fn walker(&self, root: &Path, loops: Arc<Mutex<Vec<PathBuf>>>) -> WalkDir {
        let walker = WalkDir::new(root)
            .parallelism(parallelism(self.config.threads))
            .sort(true)
            .skip_hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .max_depth(self.config.depth_limit());

        if !self.config.follow_symlinks {
            return walker;
        }

        // The root entry is passed through here first, so it is tracked
        // like any other directory.
        let tracker = Arc::new(InodeTracker::new());
        walker.process_read_dir(move |_, _, _, children| {
            for dir_entry in children.iter_mut().flatten() {
                if dir_entry.read_children_path.is_none() {
                    continue;
                }
                let path = dir_entry.path();
                let Some(key) = DirKey::of(&path) else {
                    continue;
                };
                if !tracker.track(key) {
                    dir_entry.read_children_path = None;
                    if let Ok(mut loops) = loops.lock() {
                        loops.push(path);
                    }
                }
            }
        })
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a walker error into a warning, attributing it to `fallback` when
/// the error carries no path.
fn warning_from(err: &jwalk::Error, fallback: &Path) -> PathWarning {
    let path = err
        .path()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| fallback.to_path_buf());
    match err.io_error() {
        Some(io) => PathWarning::read_error(path, io),
        None => PathWarning::new(path, err.to_string(), WarningKind::ReadError),
    }
}

/// Record a warning once per path.
fn push_warning(warnings: &mut Vec<PathWarning>, warning: PathWarning) {
    if warnings.iter().any(|w| w.path == warning.path) {
        return;
    }
    warn!(path = %warning.path.display(), error = %warning.message, "skipping unreadable entry");
    warnings.push(warning);
}

fn parallelism(threads: usize) -> Parallelism {
    match threads {
        0 => Parallelism::RayonDefaultPool {
            busy_timeout: Duration::from_millis(100),
        },
        1 => Parallelism::Serial,
        n => Parallelism::RayonNewPool(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("sub")).unwrap();
        fs::create_dir(root.join("sub/deeper")).unwrap();
        fs::create_dir(root.join("test_dir")).unwrap();

        fs::write(root.join("test1.txt"), "a").unwrap();
        fs::write(root.join("other.txt"), "b").unwrap();
        fs::write(root.join("sub/test2.txt"), "c").unwrap();
        fs::write(root.join("sub/deeper/nested-test.log"), "d").unwrap();
        fs::write(root.join("test_dir/inside.txt"), "e").unwrap();
        fs::write(root.join("test_dir/test3.txt"), "f").unwrap();

        temp
    }

    fn names(results: &[SearchResult]) -> Vec<String> {
        let mut names: Vec<_> = results.iter().map(|r| r.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_finds_matches_at_every_depth() {
        let temp = create_test_tree();
        let results = Searcher::new().search(temp.path(), "test");

        assert_eq!(
            names(&results),
            vec![
                "nested-test.log",
                "test1.txt",
                "test2.txt",
                "test3.txt",
                "test_dir"
            ]
        );

        let nested = results.iter().find(|r| r.name == "test2.txt").unwrap();
        assert_eq!(nested.path, temp.path().join("sub/test2.txt"));
    }

    #[test]
    fn test_matching_directory_is_still_descended() {
        let temp = create_test_tree();
        let results = Searcher::new().search(temp.path(), "test");

        assert!(results.iter().any(|r| r.name == "test_dir"));
        assert!(results.iter().any(|r| r.name == "test3.txt"));
    }

    #[test]
    fn test_match_is_case_sensitive_substring() {
        let temp = create_test_tree();

        assert!(Searcher::new().search(temp.path(), "TEST").is_empty());
        assert!(Searcher::new().search(temp.path(), "test*").is_empty());
        assert_eq!(Searcher::new().search(temp.path(), "her.t").len(), 1);
    }

    #[test]
    fn test_root_itself_is_not_reported() {
        let temp = create_test_tree();
        let root_name = temp.path().file_name().unwrap().to_string_lossy().to_string();
        let results = Searcher::new().search(temp.path(), &root_name);

        assert!(results.iter().all(|r| r.path != temp.path()));
    }

    #[test]
    fn test_no_matches_is_empty() {
        let temp = create_test_tree();
        let report =
            Searcher::new().search_report(temp.path(), "nonexistent", &CancellationToken::new());

        assert!(report.is_empty());
        assert!(report.warnings.is_empty());
        assert!(!report.cancelled);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let results = Searcher::new().search(&temp.path().join("missing"), "test");
        assert!(results.is_empty());
    }

    #[test]
    fn test_max_depth() {
        let temp = create_test_tree();
        let config = WalkConfig::builder().max_depth(Some(1u32)).build().unwrap();
        let results = Searcher::with_config(config).search(temp.path(), "test");

        assert_eq!(names(&results), vec!["test1.txt", "test_dir"]);
    }

    #[test]
    fn test_hidden_entries_can_be_skipped() {
        let temp = create_test_tree();
        fs::create_dir(temp.path().join(".cache")).unwrap();
        fs::write(temp.path().join(".cache/test-hidden"), "").unwrap();

        let all = Searcher::new().search(temp.path(), "test-hidden");
        assert_eq!(all.len(), 1);

        let config = WalkConfig::builder().include_hidden(false).build().unwrap();
        let visible = Searcher::with_config(config).search(temp.path(), "test-hidden");
        assert!(visible.is_empty());
    }

    #[test]
    fn test_cancelled_before_start() {
        let temp = create_test_tree();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = Searcher::new().search_report(temp.path(), "test", &cancel);
        assert!(report.cancelled);
        assert!(report.is_empty());
    }

    #[test]
    fn test_progress_is_published() {
        let temp = create_test_tree();
        let config = WalkConfig::builder().progress_interval(1u64).build().unwrap();
        let searcher = Searcher::with_config(config);
        let mut rx = searcher.subscribe();

        searcher.search(temp.path(), "test");

        let first = rx.try_recv().unwrap();
        assert_eq!(first.entries_visited, 1);
    }

    #[test]
    fn test_zero_progress_interval_does_not_panic() {
        let temp = create_test_tree();
        let config = WalkConfig {
            progress_interval: 0,
            ..Default::default()
        };
        let searcher = Searcher::with_config(config);
        let mut rx = searcher.subscribe();

        let results = searcher.search(temp.path(), "test");

        assert_eq!(results.len(), 5);
        assert_eq!(rx.try_recv().unwrap().entries_visited, 1);
    }

    #[test]
    fn test_follow_symlinks_finds_everything_without_loops() {
        let temp = create_test_tree();
        let config = WalkConfig::builder().follow_symlinks(true).build().unwrap();
        let report = Searcher::with_config(config).search_report(
            temp.path(),
            "test",
            &CancellationToken::new(),
        );

        assert_eq!(
            names(&report.results),
            vec![
                "nested-test.log",
                "test1.txt",
                "test2.txt",
                "test3.txt",
                "test_dir"
            ]
        );
        assert!(report.warnings.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_follow_symlinks_descends_linked_directory() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("test-linked.txt"), "").unwrap();
        let temp = create_test_tree();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();

        let config = WalkConfig::builder().follow_symlinks(true).build().unwrap();
        let results = Searcher::with_config(config).search(temp.path(), "test-linked");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, temp.path().join("link/test-linked.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_cut() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink(temp.path(), temp.path().join("sub/loop")).unwrap();

        let config = WalkConfig::builder().follow_symlinks(true).build().unwrap();
        let report = Searcher::with_config(config).search_report(
            temp.path(),
            "loop",
            &CancellationToken::new(),
        );

        assert_eq!(report.len(), 1);
        assert_eq!(report.results[0].path, temp.path().join("sub/loop"));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::SymlinkLoop && w.path.ends_with("sub/loop")));
        assert!(report.warnings.iter().all(|w| w.path != temp.path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_not_followed_by_default() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink(temp.path().join("sub"), temp.path().join("alias")).unwrap();

        let results = Searcher::new().search(temp.path(), "test2");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, temp.path().join("sub/test2.txt"));
    }
}
