//! Configuration loading and typed config structures.
//!
//! The configuration lives in `brunzit-config.yaml` in the working
//! directory. Every field has a default, so an empty or partial file is
//! valid; [`BrunzitConfig::validate`] then rejects values the runtime cannot
//! work with.

use std::path::Path;

use brunzit_agents::{DEFAULT_MAX_GROUP_SIZE, FlockConfig, Viewport};
use serde::Deserialize;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "brunzit-config.yaml";

/// Environment variable that overrides the configuration file path.
pub const CONFIG_PATH_ENV: &str = "BRUNZIT_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The file parsed but holds an unusable value.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `brunzit-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BrunzitConfig {
    /// Screen, frame rate, seed and initial background.
    #[serde(default)]
    pub world: WorldConfig,

    /// Physical constants applied to every new group.
    #[serde(default)]
    pub flock: FlockSettings,

    /// Log level and periodic summaries.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BrunzitConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.viewport().is_valid() {
            return Err(invalid(format!(
                "world size must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.world.frame_rate == 0 {
            return Err(invalid("world.frame_rate must be at least 1".to_owned()));
        }
        for (name, value) in [
            ("flock.max_speed", self.flock.max_speed),
            ("flock.max_steer_force", self.flock.max_steer_force),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if !self.flock.initial_volume.is_finite() || self.flock.initial_volume < 0.0 {
            return Err(invalid(format!(
                "flock.initial_volume must not be negative, got {}",
                self.flock.initial_volume
            )));
        }
        if self.flock.max_group_size == 0 {
            return Err(invalid("flock.max_group_size must be at least 1".to_owned()));
        }
        Ok(())
    }

    /// The toroidal screen area.
    pub const fn viewport(&self) -> Viewport {
        Viewport::new(self.world.width, self.world.height)
    }

    /// Physical constants handed to every new flock.
    pub const fn flock_config(&self) -> FlockConfig {
        FlockConfig {
            max_speed: self.flock.max_speed,
            max_steer_force: self.flock.max_steer_force,
            initial_volume: self.flock.initial_volume,
            max_group_size: self.flock.max_group_size,
            viewport: self.viewport(),
        }
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid { reason }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable session name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed. Absent means seed from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Viewport width in pixels.
    #[serde(default = "default_width")]
    pub width: f32,

    /// Viewport height in pixels.
    #[serde(default = "default_height")]
    pub height: f32,

    /// Ticks per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// Colour name of the initial background.
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: None,
            width: default_width(),
            height: default_height(),
            frame_rate: default_frame_rate(),
            background: default_background(),
        }
    }
}

/// Flock constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlockSettings {
    /// Velocity magnitude cap.
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,

    /// Magnitude cap of one steering correction.
    #[serde(default = "default_max_steer_force")]
    pub max_steer_force: f32,

    /// Total voice volume split evenly over a new group's agents.
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,

    /// Largest agent count a single `make` may request.
    #[serde(default = "default_max_group_size")]
    pub max_group_size: u32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            max_speed: default_max_speed(),
            max_steer_force: default_max_steer_force(),
            initial_volume: default_initial_volume(),
            max_group_size: default_max_group_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log a summary every this many ticks. Zero disables it.
    #[serde(default = "default_summary_interval_ticks")]
    pub summary_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            summary_interval_ticks: default_summary_interval_ticks(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "brunzit".to_owned()
}

const fn default_width() -> f32 {
    1280.0
}

const fn default_height() -> f32 {
    720.0
}

const fn default_frame_rate() -> u32 {
    30
}

fn default_background() -> String {
    "Black".to_owned()
}

const fn default_max_speed() -> f32 {
    4.0
}

const fn default_max_steer_force() -> f32 {
    0.05
}

const fn default_initial_volume() -> f32 {
    0.05
}

const fn default_max_group_size() -> u32 {
    DEFAULT_MAX_GROUP_SIZE
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_summary_interval_ticks() -> u64 {
    300
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BrunzitConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.frame_rate, 30);
        assert_eq!(config.world.seed, None);
        assert_eq!(config.flock_config(), FlockConfig::default());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
world:
  name: rehearsal
  seed: 7
  width: 800
  height: 600
  frame_rate: 60
  background: navy
flock:
  max_speed: 3.0
  max_steer_force: 0.1
  initial_volume: 0.2
  max_group_size: 500
logging:
  level: debug
  summary_interval_ticks: 0
";
        let config = BrunzitConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "rehearsal");
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.world.frame_rate, 60);
        assert_eq!(config.world.background, "navy");
        assert_eq!(config.viewport(), Viewport::new(800.0, 600.0));
        let flock = config.flock_config();
        assert!((flock.max_speed - 3.0).abs() < f32::EPSILON);
        assert!((flock.max_steer_force - 0.1).abs() < f32::EPSILON);
        assert_eq!(flock.max_group_size, 500);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.summary_interval_ticks, 0);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = BrunzitConfig::parse("world:\n  seed: 3\n").unwrap();
        assert_eq!(config.world.seed, Some(3));
        assert_eq!(config.flock, FlockSettings::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = BrunzitConfig::parse("{}").unwrap();
        assert_eq!(config, BrunzitConfig::default());
    }

    #[test]
    fn rejects_zero_frame_rate() {
        let err = BrunzitConfig::parse("world:\n  frame_rate: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_bad_viewport_and_constants() {
        assert!(matches!(
            BrunzitConfig::parse("world:\n  width: 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            BrunzitConfig::parse("flock:\n  max_steer_force: -1\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            BrunzitConfig::parse("flock:\n  initial_volume: -0.5\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            BrunzitConfig::parse("flock:\n  max_group_size: 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(matches!(
            BrunzitConfig::parse("world: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BrunzitConfig::from_file(Path::new("definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../brunzit-config.yaml");
        let config = BrunzitConfig::from_file(&path).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.name, "brunzit");
    }
}
