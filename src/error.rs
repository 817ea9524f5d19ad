//! Error handling for lrcsync
//!
//! The parsing and synchronization core is total and never fails. Errors only
//! come from the collaborators around it: configuration loading, reading lyrics
//! from disk or from audio tags, and the terminal.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LrcSyncError {
    #[error("File system error: {0}")]
    FileSystem(#[from] FileSystemError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lyrics source error: {0}")]
    Source(#[from] SourceError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum FileSystemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Unable to determine project directories")]
    NoProjectDirs,
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid track path: {path}")]
    InvalidTrackPath { path: PathBuf },

    #[error("Failed to read lyrics file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read audio tags from {path}: {source}")]
    Tags {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },
}

pub type Result<T> = std::result::Result<T, LrcSyncError>;

impl From<std::io::Error> for LrcSyncError {
    fn from(err: std::io::Error) -> Self {
        LrcSyncError::FileSystem(FileSystemError::Io(err))
    }
}

impl From<toml::de::Error> for LrcSyncError {
    fn from(err: toml::de::Error) -> Self {
        LrcSyncError::Config(ConfigError::InvalidFormat(err))
    }
}

impl From<toml::ser::Error> for LrcSyncError {
    fn from(err: toml::ser::Error) -> Self {
        LrcSyncError::Config(ConfigError::Serialize(err))
    }
}
