//! Runner error types.

use crate::clients::{GitError, ReviewError};
use crate::summary::Stage;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a run before any repository is processed.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Review(#[from] ReviewError),

    /// The run log could not be opened.
    #[error("Failed to open run log '{}': {source}", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The clone root could not be created.
    #[error("Failed to create working directory root: {0}")]
    WorkRoot(#[source] std::io::Error),
}

/// Errors isolated to a single repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The per-repository directory could not be reset.
    #[error("Failed to prepare working directory '{}': {source}", path.display())]
    WorkDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Authentication or network failure while cloning.
    #[error("Failed to clone repository: {0}")]
    Clone(#[source] GitError),

    /// The commit identity could not be configured.
    #[error("Failed to configure commit identity: {0}")]
    Identity(#[source] GitError),

    /// The fork could not be found or created.
    #[error("Failed to ensure fork: {0}")]
    Fork(#[source] ReviewError),

    /// The fork remote could not be registered.
    #[error("Failed to register fork remote: {0}")]
    Remote(#[source] GitError),

    /// A remote could not be fetched.
    #[error("Failed to fetch remote: {0}")]
    Fetch(#[source] GitError),
}

impl RepositoryError {
    /// The step this error belongs to.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::WorkDir { .. } => Stage::WorkDir,
            Self::Clone(_) => Stage::Clone,
            Self::Identity(_) => Stage::Identity,
            Self::Fork(_) => Stage::Fork,
            Self::Remote(_) => Stage::Remote,
            Self::Fetch(_) => Stage::Fetch,
        }
    }
}
