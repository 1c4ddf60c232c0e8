//! Branch processing error types.

use crate::clients::GitError;
use crate::pull_requests::PrError;
use crate::summary::Stage;
use thiserror::Error;

/// Errors isolated to a single branch.
#[derive(Debug, Error)]
pub enum BranchError {
    /// Could not tell whether the branch exists.
    #[error("Failed to look up branch: {0}")]
    LookupFailed(#[source] GitError),

    /// The branch could not be brought to the origin tip.
    #[error("Failed to sync branch with origin: {0}")]
    SyncFailed(#[source] GitError),

    /// The migration branch could not be created.
    #[error("Failed to create migration branch: {0}")]
    BranchFailed(#[source] GitError),

    /// Modified files could not be staged.
    #[error("Failed to stage changes: {0}")]
    StageFailed(#[source] GitError),

    /// The substitution commit failed.
    #[error("Failed to commit changes: {0}")]
    CommitFailed(#[source] GitError),

    /// Push or pull request handling failed.
    #[error(transparent)]
    Publish(#[from] PrError),
}

impl BranchError {
    /// The step this error belongs to.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::LookupFailed(_) | Self::SyncFailed(_) => Stage::Checkout,
            Self::BranchFailed(_) => Stage::Branch,
            Self::StageFailed(_) => Stage::Stage,
            Self::CommitFailed(_) => Stage::Commit,
            Self::Publish(e) => e.stage(),
        }
    }
}
