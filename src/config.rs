//! Configuration persistence for capture settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Save location for finished screenshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    #[default]
    Downloads,
    Pictures,
    Documents,
}

impl SaveLocation {
    /// Resolve to a directory, falling back to `$HOME/<Name>`
    pub fn directory(self) -> Option<PathBuf> {
        match self {
            SaveLocation::Downloads => {
                dirs::download_dir().or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
            }
            SaveLocation::Pictures => {
                dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
            }
            SaveLocation::Documents => {
                dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
            }
        }
    }
}

/// Capture settings persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Overlap between neighbouring tiles in CSS pixels
    pub overlap_px: f64,
    /// Wait after each tile scroll before snapshotting
    pub settle_delay_ms: u64,
    /// Wait after scrolling a region into view for a single snapshot
    pub single_shot_settle_delay_ms: u64,
    /// Where to save screenshots
    pub save_location: SaveLocation,
    /// File names are `<prefix>-<unix-time-ms>.png`
    pub filename_prefix: String,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            overlap_px: 50.0,
            settle_delay_ms: 300,
            single_shot_settle_delay_ms: 500,
            save_location: SaveLocation::Downloads,
            filename_prefix: "element-screenshot".to_string(),
        }
    }
}

impl StitchConfig {
    /// Directory name under the user config dir
    pub const ID: &'static str = "pagestitch";

    /// Default location of the config file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn single_shot_settle_delay(&self) -> Duration {
        Duration::from_millis(self.single_shot_settle_delay_ms)
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {err:?}");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory available, settings not saved");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {err:?}");
        }
    }

    /// Save configuration to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StitchConfig::default();
        assert_eq!(config.overlap_px, 50.0);
        assert_eq!(config.settle_delay(), Duration::from_millis(300));
        assert_eq!(config.single_shot_settle_delay(), Duration::from_millis(500));
        assert_eq!(config.save_location, SaveLocation::Downloads);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = StitchConfig {
            overlap_px: 24.0,
            save_location: SaveLocation::Pictures,
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(StitchConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "settle_delay_ms": 120 }"#).unwrap();

        let config = StitchConfig::load_from(&path).unwrap();
        assert_eq!(config.settle_delay_ms, 120);
        assert_eq!(config.overlap_px, 50.0);
        assert_eq!(config.filename_prefix, "element-screenshot");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(StitchConfig::load_from(&path).is_err());
    }
}
