//! Persistent user settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use jingtool_core::WalkConfig;

/// Settings read from `settings.toml` in the user's config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ask before deleting anything.
    pub confirm_delete: bool,
    /// Root used by `search` when none is given.
    pub default_root: Option<PathBuf>,
    /// Traversal options for listing and search.
    pub walk: WalkConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            confirm_delete: true,
            default_root: None,
            walk: WalkConfig::default(),
        }
    }
}

impl Settings {
    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("jingtool").join("settings.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .map(|content| Self::parse(&content))
            .unwrap_or_default()
    }

    /// Parse settings, falling back to defaults when malformed.
    pub fn parse(content: &str) -> Self {
        let mut settings: Self = toml::from_str(content).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring malformed settings file");
            Self::default()
        });

        if settings.walk.progress_interval == 0 {
            tracing::warn!("walk.progress_interval must be at least 1, using the default");
            settings.walk.progress_interval = WalkConfig::default().progress_interval;
        }
        settings
    }

    /// Save settings to disk.
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No config directory")
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(&path, content)
    }
}
