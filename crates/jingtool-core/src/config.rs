//! Traversal configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for listing and recursive search.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkConfig {
    /// Follow symbolic links while descending.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Maximum depth to traverse below the root (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Include hidden entries (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Traversal threads: 1 = serial, 0 = shared rayon pool, n = dedicated pool.
    #[builder(default = "1")]
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Publish a progress snapshot every this many visited entries.
    #[builder(default = "1000")]
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_true() -> bool {
    true
}

fn default_threads() -> usize {
    1
}

fn default_progress_interval() -> u64 {
    1000
}

impl WalkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.progress_interval == Some(0) {
            return Err("Progress interval must be at least 1".to_string());
        }
        Ok(())
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }

    /// Depth limit in the form the walker expects.
    pub fn depth_limit(&self) -> usize {
        self.max_depth.map(|d| d as usize).unwrap_or(usize::MAX)
    }

    /// Progress interval, never zero even when the config was built by hand
    /// or deserialized.
    pub fn progress_every(&self) -> u64 {
        self.progress_interval.max(1)
    }

    /// Check if an entry should be skipped because it is hidden.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            max_depth: None,
            include_hidden: true,
            threads: 1,
            progress_interval: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WalkConfig::builder()
            .follow_symlinks(true)
            .max_depth(Some(3u32))
            .threads(4usize)
            .build()
            .unwrap();

        assert!(config.follow_symlinks);
        assert_eq!(config.max_depth, Some(3));
        assert_eq!(config.threads, 4);
        assert!(config.include_hidden);
        assert_eq!(config.depth_limit(), 3);
    }

    #[test]
    fn test_builder_rejects_zero_interval() {
        let result = WalkConfig::builder().progress_interval(0u64).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_progress_every_is_never_zero() {
        let config = WalkConfig {
            progress_interval: 0,
            ..Default::default()
        };
        assert_eq!(config.progress_every(), 1);
        assert_eq!(WalkConfig::default().progress_every(), 1000);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let built = WalkConfig::builder().build().unwrap();
        assert_eq!(built, WalkConfig::default());
        assert_eq!(built.depth_limit(), usize::MAX);
    }

    #[test]
    fn test_should_skip_hidden() {
        let mut config = WalkConfig::default();

        // By default, hidden entries are included
        assert!(!config.should_skip_hidden(".git"));

        config.include_hidden = false;
        assert!(config.should_skip_hidden(".git"));
        assert!(!config.should_skip_hidden("src"));
    }
}
