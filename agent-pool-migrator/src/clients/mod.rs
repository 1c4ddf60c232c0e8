//! Narrow interfaces over git and the code hosting API.
//!
//! Orchestration only talks to [`RepositoryClient`] and [`ReviewClient`], so
//! the walker and branch processor can be driven by in-memory fakes.

mod error;
mod git;
mod github;

pub use error::{GitError, ReviewError};
pub use git::GitCli;
pub use github::GitHubClient;

use crate::config::RepositoryId;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Remote name of the upstream repository in every clone.
pub const ORIGIN_REMOTE: &str = "origin";

/// Remote name of the user's fork in every clone.
pub const FORK_REMOTE: &str = "fork";

/// Local git operations on a per-repository working copy.
///
/// Every method takes the clone's path explicitly; implementations never rely
/// on the process working directory.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Clones `repository` into `destination`, naming the remote [`ORIGIN_REMOTE`].
    async fn clone_repository(
        &self,
        repository: &RepositoryId,
        destination: &Path,
    ) -> Result<(), GitError>;

    /// Sets the author identity used for commits and sign-off trailers.
    async fn configure_identity(
        &self,
        workdir: &Path,
        name: &str,
        email: &str,
    ) -> Result<(), GitError>;

    /// Registers (or repoints) a remote at `repository`.
    async fn add_remote(
        &self,
        workdir: &Path,
        remote: &str,
        repository: &RepositoryId,
    ) -> Result<(), GitError>;

    /// Fetches all branches of a remote.
    async fn fetch(&self, workdir: &Path, remote: &str) -> Result<(), GitError>;

    /// Returns true if the last fetch saw `branch` on `remote`.
    async fn remote_branch_exists(
        &self,
        workdir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<bool, GitError>;

    /// Checks out `branch` at the tip of `remote`, discarding local edits.
    ///
    /// Fails if the local branch cannot be fast-forwarded.
    async fn checkout_remote_branch(
        &self,
        workdir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<(), GitError>;

    /// Deletes a local branch if it exists.
    async fn delete_local_branch(&self, workdir: &Path, branch: &str) -> Result<(), GitError>;

    /// Creates `branch` from the current checkout and switches to it.
    async fn create_branch(&self, workdir: &Path, branch: &str) -> Result<(), GitError>;

    /// Stages modified tracked files only and returns them.
    ///
    /// New and deleted files are never staged.
    async fn stage_modified(&self, workdir: &Path) -> Result<Vec<PathBuf>, GitError>;

    /// Commits staged changes with a sign-off trailer.
    async fn commit(&self, workdir: &Path, message: &str) -> Result<(), GitError>;

    /// Force-pushes a local branch to the same name on `remote`.
    async fn push(&self, workdir: &Path, remote: &str, branch: &str) -> Result<(), GitError>;
}

/// Fork and pull request operations on the code host.
#[async_trait]
pub trait ReviewClient: Send + Sync {
    /// Returns true if `owner` has a fork of `upstream`.
    async fn fork_exists(&self, upstream: &RepositoryId, owner: &str)
        -> Result<bool, ReviewError>;

    /// Requests a fork of `upstream` under the authenticated user.
    async fn create_fork(&self, upstream: &RepositoryId) -> Result<(), ReviewError>;

    /// Finds an open pull request from `head_owner:head_branch` into `base`.
    async fn find_open_pull_request(
        &self,
        upstream: &RepositoryId,
        head_owner: &str,
        head_branch: &str,
        base: &str,
    ) -> Result<Option<PullRequestRef>, ReviewError>;

    /// Opens a pull request against `upstream`.
    async fn create_pull_request(
        &self,
        upstream: &RepositoryId,
        request: &NewPullRequest,
    ) -> Result<PullRequestRef, ReviewError>;
}

/// An existing pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// GitHub PR number.
    pub number: u64,
    /// GitHub PR URL.
    pub url: String,
}

/// A pull request to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    /// PR title.
    pub title: String,
    /// Head reference, `owner:branch` for cross-fork PRs.
    pub head: String,
    /// Base branch in the upstream repository.
    pub base: String,
    /// Rendered PR body.
    pub body: String,
}
