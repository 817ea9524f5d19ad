pub mod env;
pub mod validation;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::env::{EnvParser, EnvVars};
use crate::config::validation::ConfigValidator;
use crate::core::playback::FeedMode;
use crate::error::{ConfigError, LrcSyncError, Result};

pub const POLL_INTERVAL_RANGE: (u64, u64) = (10, 5000);
pub const CONTEXT_LINES_RANGE: (usize, usize) = (0, 50);
pub const END_GRACE_RANGE: (u64, u64) = (0, 600);

/// Every key accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "feed_mode",
    "poll_interval_ms",
    "context_lines",
    "prefer_embedded_lyrics",
    "end_grace_seconds",
];

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_context_lines() -> usize {
    3
}

fn default_end_grace_seconds() -> u64 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// How playback time reaches the synchronizer: `push` or `poll`
    #[serde(default)]
    pub feed_mode: FeedMode,

    /// Sampling period when polling the player (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Lines shown above and below the active line
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Look at embedded tag lyrics before a sidecar .lrc file
    #[serde(default)]
    pub prefer_embedded_lyrics: bool,

    /// How long `play` keeps running after the last line starts (seconds)
    #[serde(default = "default_end_grace_seconds")]
    pub end_grace_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_mode: FeedMode::default(),
            poll_interval_ms: default_poll_interval_ms(),
            context_lines: default_context_lines(),
            prefer_embedded_lyrics: false,
            end_grace_seconds: default_end_grace_seconds(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the config file, then `.env` and
    /// `LRCSYNC_*` environment variables.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_file = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                ConfigValidator::validate_toml_path(&path)?;
                path
            }
            None => Self::default_config_path()?,
        };

        let mut config = Self::from_file(&config_file)?;
        config.load_from_env()?;
        config.validate()?;

        // Write out a config file on first run so users can find and edit it
        if !config_file.exists() {
            if let Some(parent) = config_file.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::default().save(&config_file)?;
            debug!("Created default config at {}", config_file.display());
        }

        Ok(config)
    }

    /// Read a config file, falling back to defaults when it does not exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `LRCSYNC_*` environment overrides
    pub fn load_from_env(&mut self) -> Result<()> {
        if let Some(mode) = EnvParser::parse_string(EnvVars::FEED_MODE, None)? {
            self.feed_mode = mode
                .parse()
                .map_err(|e: String| LrcSyncError::Validation(format!("{}: {}", EnvVars::FEED_MODE, e)))?;
        }

        let (min, max) = POLL_INTERVAL_RANGE;
        if let Some(interval) = EnvParser::parse_u64(EnvVars::POLL_INTERVAL_MS, min, max)? {
            self.poll_interval_ms = interval;
        }

        let (min, max) = CONTEXT_LINES_RANGE;
        if let Some(context) = EnvParser::parse_usize(EnvVars::CONTEXT_LINES, min, max)? {
            self.context_lines = context;
        }

        if let Some(prefer) = EnvParser::parse_bool(EnvVars::PREFER_EMBEDDED_LYRICS)? {
            self.prefer_embedded_lyrics = prefer;
        }

        let (min, max) = END_GRACE_RANGE;
        if let Some(grace) = EnvParser::parse_u64(EnvVars::END_GRACE_SECONDS, min, max)? {
            self.end_grace_seconds = grace;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let (min, max) = POLL_INTERVAL_RANGE;
        ConfigValidator::validate_range(self.poll_interval_ms, min, max, "poll_interval_ms")?;

        let (min, max) = CONTEXT_LINES_RANGE;
        ConfigValidator::validate_range(self.context_lines, min, max, "context_lines")?;

        let (min, max) = END_GRACE_RANGE;
        ConfigValidator::validate_range(self.end_grace_seconds, min, max, "end_grace_seconds")?;

        Ok(())
    }

    /// Read one key as a string
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "feed_mode" => self.feed_mode.to_string(),
            "poll_interval_ms" => self.poll_interval_ms.to_string(),
            "context_lines" => self.context_lines.to_string(),
            "prefer_embedded_lyrics" => self.prefer_embedded_lyrics.to_string(),
            "end_grace_seconds" => self.end_grace_seconds.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set one key from a string, validating the result
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || {
            LrcSyncError::Config(ConfigError::InvalidValue {
                field: key.to_string(),
                value: value.to_string(),
            })
        };

        let mut updated = self.clone();
        match key {
            "feed_mode" => updated.feed_mode = value.parse().map_err(|_| invalid())?,
            "poll_interval_ms" => updated.poll_interval_ms = value.trim().parse().map_err(|_| invalid())?,
            "context_lines" => updated.context_lines = value.trim().parse().map_err(|_| invalid())?,
            "prefer_embedded_lyrics" => {
                updated.prefer_embedded_lyrics = value.trim().parse().map_err(|_| invalid())?
            }
            "end_grace_seconds" => updated.end_grace_seconds = value.trim().parse().map_err(|_| invalid())?,
            _ => return Err(unknown_key(key)),
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn default_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("net", "lrcsync", "lrcsync")
            .ok_or(LrcSyncError::Config(ConfigError::NoProjectDirs))?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    pub fn config_path(config_path: Option<&str>) -> Result<PathBuf> {
        match config_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::default_config_path(),
        }
    }
}

fn unknown_key(key: &str) -> LrcSyncError {
    LrcSyncError::Validation(format!(
        "Unknown configuration key: {} (available: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
