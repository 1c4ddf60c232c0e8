//! Per-branch migration results.

use std::fmt;
use std::path::PathBuf;

/// The step a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    WorkDir,
    Clone,
    Identity,
    Fork,
    Remote,
    Fetch,
    Checkout,
    Branch,
    Stage,
    Commit,
    Push,
    PullRequest,
}

impl Stage {
    /// Returns the stage name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkDir => "workdir",
            Self::Clone => "clone",
            Self::Identity => "identity",
            Self::Fork => "fork",
            Self::Remote => "remote",
            Self::Fetch => "fetch",
            Self::Checkout => "checkout",
            Self::Branch => "branch",
            Self::Stage => "stage",
            Self::Commit => "commit",
            Self::Push => "push",
            Self::PullRequest => "pull-request",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of migrating one branch of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The repository is on the skip list.
    Skipped,

    /// The branch does not exist on origin.
    BranchMissing,

    /// No candidate file contained any old pool name.
    NoChanges,

    /// A new pull request was opened.
    PrCreated {
        /// GitHub PR URL.
        url: String,
    },

    /// An open pull request already existed and its branch was force-pushed.
    PrUpdated {
        /// GitHub PR URL.
        url: String,
    },

    /// Dry run: files that would have been committed.
    DryRun {
        /// Changed files.
        files: Vec<PathBuf>,
    },

    /// A step failed.
    Failed {
        /// Step that failed.
        stage: Stage,
        /// Error message.
        error: String,
    },
}

impl Outcome {
    /// Returns the outcome name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::BranchMissing => "branch-missing",
            Self::NoChanges => "no-changes",
            Self::PrCreated { .. } => "pr-created",
            Self::PrUpdated { .. } => "pr-updated",
            Self::DryRun { .. } => "dry-run",
            Self::Failed { .. } => "failed",
        }
    }

    /// Returns the PR URL if one was created or updated.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::PrCreated { url } | Self::PrUpdated { url } => Some(url),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())?;
        match self {
            Self::PrCreated { url } | Self::PrUpdated { url } => write!(f, " {url}"),
            Self::DryRun { files } => {
                let files: Vec<_> = files.iter().map(|p| p.display().to_string()).collect();
                write!(f, " {}", files.join(", "))
            }
            Self::Failed { stage, error } => write!(f, " [{stage}] {error}"),
            _ => Ok(()),
        }
    }
}

/// Result of one `(repository, branch)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Repository full name.
    pub repository: String,

    /// Target branch.
    pub branch: String,

    /// What happened.
    pub outcome: Outcome,
}
