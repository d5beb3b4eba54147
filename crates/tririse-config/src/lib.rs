//! Configuration file handling for tririse.
//!
//! The config lives at `<config dir>/tririse/config.toml`. Every field is
//! optional; anything missing falls back to its default, and a missing file
//! is the same as an empty one.

use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tririse_core::AnimationSpeed;

pub use tririse_core::DEFAULT_DENSITY;

/// Base color used when none is configured.
pub const DEFAULT_COLOR: &str = "#2c3e50";

/// Frame rate used when none is configured.
pub const DEFAULT_FPS: u32 = 30;

/// Accepted frame rates.
pub const FPS_RANGE: RangeInclusive<u32> = 1..=240;

const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading or saving the config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("no config directory available on this platform")]
    NoConfigDir,
}

/// User settings for the triangle field and its terminal host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base color the background and triangles derive from.
    pub color: String,
    /// Number of live triangles.
    pub density: usize,
    /// Target frames per second.
    pub fps: u32,
    /// Rise speed preset.
    pub speed: AnimationSpeed,
    /// Colors cycled through with the `c` key.
    pub palette: Vec<String>,
    /// Show the status line at the bottom of the screen.
    pub show_status: bool,
    /// Write tracing output to this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            density: DEFAULT_DENSITY,
            fps: DEFAULT_FPS,
            speed: AnimationSpeed::default(),
            palette: [
                DEFAULT_COLOR,
                "#8e44ad",
                "#16a085",
                "#c0392b",
                "#d35400",
                "rebeccapurple",
                "steelblue",
            ]
            .map(String::from)
            .to_vec(),
            show_status: true,
            log_file: None,
        }
    }
}

impl Config {
    /// Platform config file location, e.g. `~/.config/tririse/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tririse").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from `path`, or from [`default_path`](Self::default_path) when
    /// `None`. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) => Self::load_from(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml(&contents)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to `path`, or to [`default_path`](Self::default_path) when
    /// `None`, creating parent directories. Returns the path written.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path().ok_or(ConfigError::NoConfigDir)?,
        };
        let contents = self.to_toml()?;

        let write = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write)?;
        }
        fs::write(&path, contents).map_err(write)?;
        Ok(path)
    }

    /// Check value ranges. Color strings are checked when the field is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.color.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "color",
                reason: "must not be empty".to_string(),
            });
        }
        if self.density == 0 {
            return Err(ConfigError::Invalid {
                field: "density",
                reason: "must be at least 1".to_string(),
            });
        }
        if !FPS_RANGE.contains(&self.fps) {
            return Err(ConfigError::Invalid {
                field: "fps",
                reason: format!(
                    "must be between {} and {}",
                    FPS_RANGE.start(),
                    FPS_RANGE.end()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_default_density_matches_engine() {
        assert_eq!(Config::default().density, tririse_core::DEFAULT_DENSITY);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::from_toml("color = \"teal\"\nspeed = \"fast\"\n").unwrap();
        assert_eq!(config.color, "teal");
        assert_eq!(config.speed, AnimationSpeed::Fast);
        assert_eq!(config.density, DEFAULT_DENSITY);
        assert_eq!(config.fps, DEFAULT_FPS);
        assert!(config.show_status);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_toml("density = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "density", .. }));

        let err = Config::from_toml("fps = 1000").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "fps", .. }));

        let err = Config::from_toml("color = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "color", .. }));
    }

    #[test]
    fn test_malformed_file() {
        assert!(matches!(
            Config::from_toml("density = \"many\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::from_toml("colour = \"red\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            color: "hsl(30, 60%, 40%)".to_string(),
            density: 42,
            log_file: Some(PathBuf::from("/tmp/tririse.log")),
            ..Config::default()
        };
        assert_eq!(config.save(Some(&path)).unwrap(), path);
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
