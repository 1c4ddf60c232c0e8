//! Pull request status types.

use crate::clients::PullRequestRef;

/// How a migration branch ended up in a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrStatus {
    /// A new pull request was opened.
    Created(PullRequestRef),

    /// An open pull request already tracked the branch; the force-push updated it.
    Updated(PullRequestRef),
}

impl PrStatus {
    /// Returns the status as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
        }
    }

    /// Returns the pull request.
    #[must_use]
    pub fn pull_request(&self) -> &PullRequestRef {
        match self {
            Self::Created(pr) | Self::Updated(pr) => pr,
        }
    }
}
