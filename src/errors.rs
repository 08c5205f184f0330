// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Watched root does not exist: {0:?}")]
    RootNotFound(PathBuf),

    #[error("Watched root is not a directory: {0:?}")]
    RootNotDirectory(PathBuf),

    #[error("Cannot list watched root {root:?}: {reason}")]
    RootUnreadable { root: PathBuf, reason: String },

    #[error("Invalid name pattern: {0}")]
    InvalidPattern(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PollwatchError>;
