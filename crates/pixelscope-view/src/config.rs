//! Viewer configuration stored as RON.
//!
//! ```ron
//! (
//!     zoom: (min: 0.125, max: 16.0),
//!     diff_offset: 127,
//!     gain_log2_range: (-7, 10),
//!     verbose: 0,
//! )
//! ```
//!
//! Every field is optional in the file; missing ones take their defaults.
//! The default location is `<config dir>/pixelscope/config.ron`.

use std::path::{Path, PathBuf};

use pixelscope_ops::DEFAULT_DIFF_OFFSET;
use pixelscope_ops::brightness::{GAIN_LOG2_MAX, GAIN_LOG2_MIN};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::viewport::ZoomLimits;

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written.
    #[error("config I/O error at {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File is not valid RON for [`ViewerConfig`].
    #[error("config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialising the config failed.
    #[error("config serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// Values parsed but make no sense together.
    #[error("invalid config: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

/// Result type for config operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Tunable viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Zoom range for every zoom operation.
    pub zoom: ZoomLimits,
    /// Offset added by difference images.
    pub diff_offset: i64,
    /// Gain exponents reachable by gain snapping, `(min, max)`.
    pub gain_log2_range: (i32, i32),
    /// Verbosity level.
    pub verbose: u8,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomLimits::default(),
            diff_offset: DEFAULT_DIFF_OFFSET,
            gain_log2_range: (GAIN_LOG2_MIN, GAIN_LOG2_MAX),
            verbose: 0,
        }
    }
}

impl ViewerConfig {
    /// Parses a config from RON text and validates it.
    pub fn from_ron_str(text: &str) -> ConfigResult<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading config");
        Self::from_ron_str(&text)
    }

    /// Loads the config from [`default_path`], or defaults if there is no file.
    pub fn load_default() -> ConfigResult<Self> {
        match default_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Pretty RON text for this config.
    pub fn to_ron_string(&self) -> ConfigResult<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Writes this config as RON, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_ron_string()?).map_err(io_err)
    }

    /// Checks zoom limits and gain range.
    ///
    /// Zoom limits must be powers of two so that a clamped fit scale is too.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.zoom.is_valid() {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "zoom limits must satisfy 0 < min <= max, got [{}, {}]",
                    self.zoom.min, self.zoom.max
                ),
            });
        }
        if !self.zoom.is_power_of_two() {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "zoom limits must be powers of two, got [{}, {}]",
                    self.zoom.min, self.zoom.max
                ),
            });
        }
        let (lo, hi) = self.gain_log2_range;
        if lo > hi {
            return Err(ConfigError::Invalid {
                reason: format!("gain_log2_range ({lo}, {hi}) is reversed"),
            });
        }
        Ok(())
    }
}

/// `<platform config dir>/pixelscope/config.ron`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pixelscope").join("config.ron"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.zoom, ZoomLimits::default());
        assert_eq!(config.diff_offset, 127);
        assert_eq!(config.gain_log2_range, (-7, 10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = ViewerConfig::from_ron_str("(diff_offset: 0)").unwrap();
        assert_eq!(config.diff_offset, 0);
        assert_eq!(config.zoom.max, 16.0);
    }

    #[test]
    fn test_rejects_bad_limits() {
        let err = ViewerConfig::from_ron_str("(zoom: (min: 0.0, max: 4.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        let err = ViewerConfig::from_ron_str("(gain_log2_range: (3, -3))").unwrap_err();
        assert!(err.to_string().contains("reversed"));
        assert!(matches!(ViewerConfig::from_ron_str("(zoom: 5"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_non_power_of_two_limits() {
        let err = ViewerConfig::from_ron_str("(zoom: (min: 0.3, max: 16.0))").unwrap_err();
        assert!(err.to_string().contains("powers of two"));
        assert!(ViewerConfig::from_ron_str("(zoom: (min: 0.125, max: 12.0))").is_err());
        let config = ViewerConfig::from_ron_str("(zoom: (min: 0.5, max: 2.0))").unwrap();
        assert_eq!(config.zoom, ZoomLimits::new(0.5, 2.0));
    }
}
