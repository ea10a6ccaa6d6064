//! Application configuration.
//!
//! The edge margin and shift search range are explicit, documented
//! parameters rather than constants buried in the estimator.

use std::path::{Path, PathBuf};

use levelcam_frame_model::{SearchRange, ViewMode};
use serde::{Deserialize, Serialize};

use crate::error::{LevelcamError, LevelcamResult};

/// Default number of pixel columns excluded at each side of the frame.
pub const DEFAULT_MARGIN_WIDTH: u32 = 100;

/// Default wait between frames while polling the sink for a quit request.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tilt estimation parameters.
    pub tilt: TiltConfig,

    /// Display behaviour.
    pub display: DisplayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Parameters of the tilt estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Columns excluded at the left and right frame edges.
    pub margin_width: u32,

    /// Candidate row shifts, end-exclusive.
    pub search_range: SearchRange,
}

/// Display sink parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How long to wait for a quit request after each shown frame.
    pub poll_interval_ms: u64,

    /// What to show for each frame.
    pub view: ViewMode,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "levelcam=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            margin_width: DEFAULT_MARGIN_WIDTH,
            search_range: SearchRange::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            view: ViewMode::Corrected,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %config_path.display(), "Ignoring config: {e}");
                Self::default()
            }
        }
    }

    /// Load config from an explicit path. Errors propagate.
    pub fn load_from(path: &Path) -> LevelcamResult<Self> {
        if !path.exists() {
            return Err(LevelcamError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            LevelcamError::config(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Save config to the standard location.
    pub fn save(&self) -> LevelcamResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> LevelcamResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("levelcam").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("levelcam-config-{}-{name}", std::process::id()))
            .join("config.json")
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.tilt.margin_width, 100);
        assert_eq!(config.tilt.search_range.start(), -10);
        assert_eq!(config.tilt.search_range.end(), 10);
        assert_eq!(config.display.poll_interval_ms, 100);
        assert_eq!(config.display.view, ViewMode::Corrected);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"tilt": {"margin_width": 40}}"#).unwrap();
        assert_eq!(config.tilt.margin_width, 40);
        assert_eq!(config.tilt.search_range, SearchRange::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_inverted_search_range_is_rejected() {
        let result: Result<AppConfig, _> =
            serde_json::from_str(r#"{"tilt": {"search_range": {"start": 4, "end": -4}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_then_load_from_preserves_values() {
        let path = scratch_path("save");
        let mut config = AppConfig::default();
        config.tilt.margin_width = 64;
        config.display.view = ViewMode::Comparison;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_load_from_missing_file_reports_path() {
        let path = scratch_path("missing");
        match AppConfig::load_from(&path) {
            Err(LevelcamError::FileNotFound { path: reported }) => assert_eq!(reported, path),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }
}
