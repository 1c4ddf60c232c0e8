//! [`RepositoryClient`] backed by the `git` executable.

use super::{GitError, RepositoryClient, ORIGIN_REMOTE};
use crate::config::RepositoryId;
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;
use url::Url;

/// Base URL for HTTPS git transport.
const GITHUB_URL: &str = "https://github.com";

/// Username GitHub accepts alongside a token in HTTPS URLs.
const TOKEN_USERNAME: &str = "x-access-token";

/// Runs git commands, authenticating HTTPS remotes with a token.
#[derive(Clone)]
pub struct GitCli {
    token: String,
}

impl std::fmt::Debug for GitCli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitCli").finish_non_exhaustive()
    }
}

impl GitCli {
    /// Creates a client that embeds `token` in remote URLs.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Builds the authenticated HTTPS URL for a repository.
    fn remote_url(&self, repository: &RepositoryId) -> Result<String, GitError> {
        let invalid = || GitError::InvalidUrl {
            repository: repository.full_name(),
        };

        let mut url = Url::parse(GITHUB_URL).map_err(|_| invalid())?;
        url.set_path(&format!("{}/{}.git", repository.owner, repository.name));
        url.set_username(TOKEN_USERNAME).map_err(|_| invalid())?;
        url.set_password(Some(&self.token)).map_err(|_| invalid())?;
        Ok(url.into())
    }

    /// Removes the token from text that may echo a remote URL.
    fn redact(&self, text: &str) -> String {
        if self.token.is_empty() {
            text.to_string()
        } else {
            text.replace(&self.token, "***")
        }
    }

    fn describe<S: AsRef<OsStr>>(&self, args: &[S]) -> String {
        let joined = args
            .iter()
            .map(|arg| arg.as_ref().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ");
        self.redact(&joined)
    }

    /// Runs git and returns its raw output regardless of exit status.
    async fn output<S: AsRef<OsStr>>(
        &self,
        workdir: Option<&Path>,
        args: &[S],
    ) -> Result<Output, GitError> {
        let mut command = Command::new("git");
        command
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(workdir) = workdir {
            command.current_dir(workdir);
        }

        command.output().await.map_err(|e| GitError::Spawn {
            command: self.describe(args),
            source: e,
        })
    }

    /// Runs git, failing on a non-zero exit status.
    async fn run<S: AsRef<OsStr>>(
        &self,
        workdir: Option<&Path>,
        args: &[S],
    ) -> Result<String, GitError> {
        debug!(command = %self.describe(args), "Running git");
        let output = self.output(workdir, args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::Failed {
                command: self.describe(args),
                stderr: self.redact(stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Returns true if `reference` resolves to a commit.
    async fn ref_exists(&self, workdir: &Path, reference: &str) -> Result<bool, GitError> {
        let output = self
            .output(
                Some(workdir),
                &["rev-parse", "--verify", "--quiet", reference],
            )
            .await?;
        Ok(output.status.success())
    }
}

#[async_trait]
impl RepositoryClient for GitCli {
    async fn clone_repository(
        &self,
        repository: &RepositoryId,
        destination: &Path,
    ) -> Result<(), GitError> {
        debug!(repo = %repository, "Cloning repository");
        let url = self.remote_url(repository)?;
        self.run(
            None,
            &[
                OsStr::new("clone"),
                OsStr::new("--no-tags"),
                OsStr::new("--origin"),
                OsStr::new(ORIGIN_REMOTE),
                OsStr::new(&url),
                destination.as_os_str(),
            ],
        )
        .await?;
        Ok(())
    }

    async fn configure_identity(
        &self,
        workdir: &Path,
        name: &str,
        email: &str,
    ) -> Result<(), GitError> {
        self.run(Some(workdir), &["config", "user.name", name])
            .await?;
        self.run(Some(workdir), &["config", "user.email", email])
            .await?;
        Ok(())
    }

    async fn add_remote(
        &self,
        workdir: &Path,
        remote: &str,
        repository: &RepositoryId,
    ) -> Result<(), GitError> {
        let url = self.remote_url(repository)?;
        let remotes = self.run(Some(workdir), &["remote"]).await?;

        if remotes.lines().any(|line| line.trim() == remote) {
            self.run(Some(workdir), &["remote", "set-url", remote, url.as_str()])
                .await?;
        } else {
            self.run(Some(workdir), &["remote", "add", remote, url.as_str()])
                .await?;
        }
        Ok(())
    }

    async fn fetch(&self, workdir: &Path, remote: &str) -> Result<(), GitError> {
        self.run(Some(workdir), &["fetch", "--prune", "--no-tags", remote])
            .await?;
        Ok(())
    }

    async fn remote_branch_exists(
        &self,
        workdir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<bool, GitError> {
        self.ref_exists(workdir, &format!("refs/remotes/{remote}/{branch}"))
            .await
    }

    async fn checkout_remote_branch(
        &self,
        workdir: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<(), GitError> {
        let upstream = format!("{remote}/{branch}");

        if self
            .ref_exists(workdir, &format!("refs/heads/{branch}"))
            .await?
        {
            self.run(Some(workdir), &["checkout", "--force", branch])
                .await?;
            self.run(Some(workdir), &["merge", "--ff-only", upstream.as_str()])
                .await?;
        } else {
            self.run(
                Some(workdir),
                &["checkout", "--force", "-b", branch, "--track", upstream.as_str()],
            )
            .await?;
        }
        Ok(())
    }

    async fn delete_local_branch(&self, workdir: &Path, branch: &str) -> Result<(), GitError> {
        if self
            .ref_exists(workdir, &format!("refs/heads/{branch}"))
            .await?
        {
            self.run(Some(workdir), &["branch", "-D", branch]).await?;
        }
        Ok(())
    }

    async fn create_branch(&self, workdir: &Path, branch: &str) -> Result<(), GitError> {
        self.run(Some(workdir), &["checkout", "-B", branch]).await?;
        Ok(())
    }

    async fn stage_modified(&self, workdir: &Path) -> Result<Vec<PathBuf>, GitError> {
        let listing = self
            .run(
                Some(workdir),
                &["diff", "--name-only", "--diff-filter=M", "-z"],
            )
            .await?;

        let modified: Vec<PathBuf> = listing
            .split('\0')
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .collect();

        if !modified.is_empty() {
            let mut args = vec![OsStr::new("add"), OsStr::new("--")];
            args.extend(modified.iter().map(|path| path.as_os_str()));
            self.run(Some(workdir), args.as_slice()).await?;
        }

        Ok(modified)
    }

    async fn commit(&self, workdir: &Path, message: &str) -> Result<(), GitError> {
        self.run(Some(workdir), &["commit", "--signoff", "-m", message])
            .await?;
        Ok(())
    }

    async fn push(&self, workdir: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        self.run(Some(workdir), &["push", "--force", remote, refspec.as_str()])
            .await?;
        Ok(())
    }
}
