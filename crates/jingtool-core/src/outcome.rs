//! Per-item results of batch operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, FsError};

/// A single rename request: `path` is renamed to `new_name` in the same
/// parent directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    /// Full source path.
    pub path: PathBuf,
    /// Bare file name of the destination.
    pub new_name: String,
}

impl RenameRequest {
    pub fn new(path: impl Into<PathBuf>, new_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            new_name: new_name.into(),
        }
    }
}

/// Result of processing one item of a rename or delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    /// The input path this outcome belongs to.
    pub path: PathBuf,
    /// Whether the item was processed successfully.
    pub success: bool,
    /// Human-readable error message when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Error category when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl OperationOutcome {
    /// Create a successful outcome.
    pub fn succeeded(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            success: true,
            error: None,
            kind: None,
        }
    }

    /// Create a failed outcome from an error.
    pub fn failed(path: impl Into<PathBuf>, error: &FsError) -> Self {
        Self {
            path: path.into(),
            success: false,
            error: Some(error.to_string()),
            kind: Some(error.kind()),
        }
    }

    /// Create an outcome from the result of processing `path`.
    pub fn from_result(path: impl Into<PathBuf>, result: Result<(), FsError>) -> Self {
        match result {
            Ok(()) => Self::succeeded(path),
            Err(e) => Self::failed(path, &e),
        }
    }
}

/// Success/failure counts of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Count the outcomes of a batch.
    pub fn from_outcomes(outcomes: &[OperationOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        Self {
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }

    /// Check if every item succeeded.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Human-readable summary, e.g. "Renamed 3 items, 1 failed".
    pub fn describe(&self, action: &str) -> String {
        if self.failed == 0 {
            format!("{} {} items", action, self.succeeded)
        } else {
            format!("{} {} items, {} failed", action, self.succeeded, self.failed)
        }
    }
}

/// Accumulates exactly one outcome per processed input, in input order.
#[derive(Debug, Default)]
pub struct OutcomeCollector {
    outcomes: Vec<OperationOutcome>,
}

impl OutcomeCollector {
    /// Create a collector sized for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(capacity),
        }
    }

    /// Record the result of processing `path`.
    pub fn record(&mut self, path: impl Into<PathBuf>, result: Result<(), FsError>) {
        self.outcomes.push(OperationOutcome::from_result(path, result));
    }

    /// Record an outcome that was already built.
    pub fn push(&mut self, outcome: OperationOutcome) {
        self.outcomes.push(outcome);
    }

    /// Mark every remaining input as cancelled.
    pub fn fill_cancelled<I, P>(&mut self, remaining: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in remaining {
            self.outcomes
                .push(OperationOutcome::failed(path, &FsError::Cancelled));
        }
    }

    /// Number of outcomes recorded so far.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Counts of the outcomes recorded so far.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_outcomes(&self.outcomes)
    }

    /// Consume the collector and return the outcomes.
    pub fn finish(self) -> Vec<OperationOutcome> {
        self.outcomes
    }
}
