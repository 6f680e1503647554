//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Settings for a hosted game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board rows.
    #[serde(default = "default_rows")]
    rows: usize,

    /// Board columns.
    #[serde(default = "default_cols")]
    cols: usize,

    /// Score at which the game reports a win.
    #[serde(default = "default_win_score")]
    win_score: u64,

    /// RNG seed. Absent means seed from the operating system.
    #[serde(default)]
    seed: Option<u64>,

    /// Where the game is saved on exit.
    #[serde(default = "default_save_path")]
    save_path: PathBuf,
}

fn default_rows() -> usize {
    4
}

fn default_cols() -> usize {
    4
}

fn default_win_score() -> u64 {
    2048
}

fn default_save_path() -> PathBuf {
    PathBuf::from("strictly_2048_save.json")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            win_score: default_win_score(),
            seed: None,
            save_path: default_save_path(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Board rows.
    pub rows: Option<usize>,
    /// Board columns.
    pub cols: Option<usize>,
    /// Win threshold.
    pub win_score: Option<u64>,
    /// RNG seed.
    pub seed: Option<u64>,
    /// Save file.
    pub save_path: Option<PathBuf>,
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(rows = config.rows, cols = config.cols, "Config loaded successfully");
        Ok(config)
    }

    /// Reads `path` if given, otherwise starts from defaults, then applies
    /// `overrides`.
    #[instrument(skip(overrides))]
    pub fn resolve(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_overrides(overrides)
    }

    /// Replaces every field that `overrides` sets.
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let config = Self {
            rows: overrides.rows.unwrap_or(self.rows),
            cols: overrides.cols.unwrap_or(self.cols),
            win_score: overrides.win_score.unwrap_or(self.win_score),
            seed: overrides.seed.or(self.seed),
            save_path: overrides.save_path.unwrap_or(self.save_path),
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects boards without cells.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::new(format!(
                "Board must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    /// A fresh RNG, seeded when a seed is configured.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
