//! Search progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Progress snapshot published while a search runs.
#[derive(Debug, Clone)]
pub struct SearchProgress {
    /// Number of entries visited so far.
    pub entries_visited: u64,
    /// Number of matches found so far.
    pub matches: u64,
    /// Number of warnings recorded so far.
    pub warnings: u64,
    /// Entry being visited.
    pub current_path: PathBuf,
    /// Time elapsed since the search started.
    pub elapsed: Duration,
}

impl SearchProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            entries_visited: 0,
            matches: 0,
            warnings: 0,
            current_path: PathBuf::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Visit rate in entries per second.
    pub fn entries_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.entries_visited as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for SearchProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_is_zero_before_start() {
        let progress = SearchProgress::new();
        assert_eq!(progress.entries_per_second(), 0.0);
    }

    #[test]
    fn test_rate() {
        let progress = SearchProgress {
            entries_visited: 500,
            elapsed: Duration::from_secs(2),
            ..SearchProgress::new()
        };
        assert_eq!(progress.entries_per_second(), 250.0);
    }
}
