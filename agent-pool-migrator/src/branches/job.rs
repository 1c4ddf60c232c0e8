//! Branch job identity.

use crate::config::{migration_branch_name, RepositoryId};

/// One branch of one repository to migrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchJob {
    /// Upstream repository.
    pub repository: RepositoryId,

    /// Branch on origin the pull request targets.
    pub branch: String,

    /// Disposable branch holding the substitution commit.
    pub migration_branch: String,
}

impl BranchJob {
    /// Creates a job, deriving the migration branch name.
    pub fn new(repository: RepositoryId, branch: impl Into<String>) -> Self {
        let branch = branch.into();
        Self {
            migration_branch: migration_branch_name(&branch),
            repository,
            branch,
        }
    }
}
