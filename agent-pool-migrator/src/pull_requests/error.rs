//! Pull request error types.

use crate::clients::{GitError, ReviewError};
use crate::templates::TemplateError;
use crate::summary::Stage;
use thiserror::Error;

/// Errors that can occur while publishing a migration branch.
#[derive(Debug, Error)]
pub enum PrError {
    /// Force-push to the fork failed.
    #[error("Failed to push migration branch: {0}")]
    PushFailed(#[source] GitError),

    /// GitHub API error.
    #[error("Pull request lookup or creation failed: {0}")]
    ReviewFailed(#[from] ReviewError),

    /// Title or body template failed to render.
    #[error(transparent)]
    TemplateError(#[from] TemplateError),
}

impl PrError {
    /// The step this error belongs to.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::PushFailed(_) => Stage::Push,
            Self::ReviewFailed(_) | Self::TemplateError(_) => Stage::PullRequest,
        }
    }
}
