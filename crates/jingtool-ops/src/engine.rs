//! Async request engine exposing the named file browser operations.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use jingtool_core::{
    DirEntry, FsError, ListReport, OperationOutcome, RenameRequest, SearchReport, WalkConfig,
};
use jingtool_scan::{Lister, SearchProgress, Searcher};

use crate::delete::delete_many;
use crate::operation::{Request, Response};
use crate::rename::{rename_batch, rename_one};

/// Source of user-chosen folders, typically a dialog or prompt.
pub trait FolderPicker: Send + Sync {
    /// Ask for a folder. `None` means the user cancelled.
    fn pick(&self) -> Option<PathBuf>;
}

/// Picker that always cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPicker;

impl FolderPicker for NoPicker {
    fn pick(&self) -> Option<PathBuf> {
        None
    }
}

/// Picker that always answers with the same folder.
#[derive(Debug, Clone)]
pub struct FixedPicker(pub PathBuf);

impl FolderPicker for FixedPicker {
    fn pick(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Executes file browser requests.
///
/// Filesystem work runs on the blocking pool; every call returns a fully
/// materialized result. The engine keeps no state between calls apart
/// from its configuration.
pub struct FileEngine {
    config: WalkConfig,
    searcher: Arc<Searcher>,
    picker: Arc<dyn FolderPicker>,
}

impl FileEngine {
    /// Create an engine with default configuration and no folder picker.
    pub fn new() -> Self {
        Self::with_config(WalkConfig::default())
    }

    /// Create an engine with a custom walk configuration.
    pub fn with_config(config: WalkConfig) -> Self {
        Self {
            searcher: Arc::new(Searcher::with_config(config.clone())),
            config,
            picker: Arc::new(NoPicker),
        }
    }

    /// Set the folder picker used by [`FileEngine::select_folder`].
    pub fn with_picker(mut self, picker: impl FolderPicker + 'static) -> Self {
        self.picker = Arc::new(picker);
        self
    }

    /// The walk configuration in use.
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Subscribe to progress of searches run through this engine.
    pub fn subscribe_search(&self) -> broadcast::Receiver<SearchProgress> {
        self.searcher.subscribe()
    }

    /// `select-folder`: ask the picker for a directory.
    ///
    /// Anything other than an existing directory counts as cancellation.
    pub async fn select_folder(&self) -> Option<PathBuf> {
        let picker = Arc::clone(&self.picker);
        let picked = tokio::task::spawn_blocking(move || picker.pick())
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "folder picker task failed");
                None
            });

        picked.filter(|path| path.is_dir())
    }

    /// `read-dir`: immediate children of `path`, empty on any error.
    pub async fn read_dir(&self, path: PathBuf) -> Vec<DirEntry> {
        self.read_dir_report(path).await.entries
    }

    /// Like [`FileEngine::read_dir`], keeping the swallowed errors.
    pub async fn read_dir_report(&self, path: PathBuf) -> ListReport {
        let lister = Lister::with_config(self.config.clone());
        tokio::task::spawn_blocking(move || lister.list_report(&path))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "read-dir task failed");
                ListReport::default()
            })
    }

    /// `rename-file`: rename one path within its parent directory.
    pub async fn rename_file(&self, path: PathBuf, new_name: String) -> OperationOutcome {
        let fallback = path.clone();
        tokio::task::spawn_blocking(move || rename_one(&path, &new_name))
            .await
            .unwrap_or_else(|e| OperationOutcome::failed(fallback, &task_failed(e)))
    }

    /// `batch-rename`: rename each item independently, in input order.
    pub async fn batch_rename(
        &self,
        items: Vec<RenameRequest>,
        cancel: CancellationToken,
    ) -> Vec<OperationOutcome> {
        let paths: Vec<PathBuf> = items.iter().map(|r| r.path.clone()).collect();
        tokio::task::spawn_blocking(move || rename_batch(&items, &cancel))
            .await
            .unwrap_or_else(|e| all_failed(paths, &task_failed(e)))
    }

    /// `search-files`: recursive name search below `root`.
    pub async fn search_files(
        &self,
        root: PathBuf,
        keyword: String,
        cancel: CancellationToken,
    ) -> SearchReport {
        let searcher = Arc::clone(&self.searcher);
        tokio::task::spawn_blocking(move || searcher.search_report(&root, &keyword, &cancel))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "search task failed");
                SearchReport::default()
            })
    }

    /// `delete-files`: permanently delete each path, in input order.
    pub async fn delete_files(
        &self,
        paths: Vec<PathBuf>,
        cancel: CancellationToken,
    ) -> Vec<OperationOutcome> {
        let inputs = paths.clone();
        tokio::task::spawn_blocking(move || delete_many(&paths, &cancel))
            .await
            .unwrap_or_else(|e| all_failed(inputs, &task_failed(e)))
    }

    /// Dispatch a tagged request to the matching operation.
    pub async fn handle(&self, request: Request, cancel: CancellationToken) -> Response {
        debug!(op = request.name(), "handling request");
        match request {
            Request::SelectFolder => Response::Folder(self.select_folder().await),
            Request::ReadDir { path } => Response::Entries(self.read_dir(path).await),
            Request::RenameFile { path, new_name } => {
                Response::Outcome(self.rename_file(path, new_name).await)
            }
            Request::BatchRename { items } => {
                Response::Outcomes(self.batch_rename(items, cancel).await)
            }
            Request::SearchFiles { root, keyword } => {
                Response::Matches(self.search_files(root, keyword, cancel).await.results)
            }
            Request::DeleteFiles { paths } => {
                Response::Outcomes(self.delete_files(paths, cancel).await)
            }
        }
    }
}

impl Default for FileEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn task_failed(e: tokio::task::JoinError) -> FsError {
    FsError::other(format!("Task failed: {}", e))
}

fn all_failed(paths: Vec<PathBuf>, error: &FsError) -> Vec<OperationOutcome> {
    paths
        .into_iter()
        .map(|path| OperationOutcome::failed(path, error))
        .collect()
}
