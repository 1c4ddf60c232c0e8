//! Client error types.

use thiserror::Error;

/// Errors raised by a [`RepositoryClient`](super::RepositoryClient).
#[derive(Debug, Error)]
pub enum GitError {
    /// The git process could not be started.
    #[error("Failed to execute git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// git exited unsuccessfully.
    #[error("git {command} failed: {stderr}")]
    Failed { command: String, stderr: String },

    /// An authenticated remote URL could not be built.
    #[error("Invalid remote URL for '{repository}'")]
    InvalidUrl { repository: String },
}

/// Errors raised by a [`ReviewClient`](super::ReviewClient).
#[derive(Debug, Error)]
pub enum ReviewError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// A repository with the fork's name exists but is not a fork.
    #[error("'{repository}' exists but is not a fork")]
    NotAFork { repository: String },

    /// The fork was requested but never became visible.
    #[error("Fork '{repository}' was not ready after {attempts} checks")]
    ForkNotReady { repository: String, attempts: u32 },
}
