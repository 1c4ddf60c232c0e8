//! [`ReviewClient`] backed by the GitHub REST API.

use super::{NewPullRequest, PullRequestRef, ReviewClient, ReviewError};
use crate::config::RepositoryId;
use crate::rate_limit::ensure_core_rate_limit;
use async_trait::async_trait;
use octocrab::models::pulls::PullRequest;
use octocrab::{params, Octocrab};
use tracing::debug;

/// GitHub client for forks and pull requests.
#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    /// Builds an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(token: String) -> Result<Self, ReviewError> {
        let octocrab = Octocrab::builder().personal_token(token).build()?;
        Ok(Self { octocrab })
    }
}

#[async_trait]
impl ReviewClient for GitHubClient {
    async fn fork_exists(
        &self,
        upstream: &RepositoryId,
        owner: &str,
    ) -> Result<bool, ReviewError> {
        ensure_core_rate_limit(&self.octocrab).await?;

        match self.octocrab.repos(owner, &upstream.name).get().await {
            Ok(repo) if repo.fork.unwrap_or(false) => Ok(true),
            Ok(_) => Err(ReviewError::NotAFork {
                repository: upstream.with_owner(owner).full_name(),
            }),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_fork(&self, upstream: &RepositoryId) -> Result<(), ReviewError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        debug!(repo = %upstream, "Requesting fork");

        self.octocrab
            .repos(&upstream.owner, &upstream.name)
            .create_fork()
            .send()
            .await?;
        Ok(())
    }

    async fn find_open_pull_request(
        &self,
        upstream: &RepositoryId,
        head_owner: &str,
        head_branch: &str,
        base: &str,
    ) -> Result<Option<PullRequestRef>, ReviewError> {
        ensure_core_rate_limit(&self.octocrab).await?;

        let page = self
            .octocrab
            .pulls(&upstream.owner, &upstream.name)
            .list()
            .state(params::State::Open)
            .head(format!("{head_owner}:{head_branch}"))
            .base(base)
            .per_page(1u8)
            .send()
            .await?;

        Ok(page
            .items
            .first()
            .map(|pr| pull_request_ref(upstream, pr)))
    }

    async fn create_pull_request(
        &self,
        upstream: &RepositoryId,
        request: &NewPullRequest,
    ) -> Result<PullRequestRef, ReviewError> {
        ensure_core_rate_limit(&self.octocrab).await?;

        let pr = self
            .octocrab
            .pulls(&upstream.owner, &upstream.name)
            .create(&request.title, &request.head, &request.base)
            .body(&request.body)
            .send()
            .await?;

        Ok(pull_request_ref(upstream, &pr))
    }
}

fn pull_request_ref(upstream: &RepositoryId, pr: &PullRequest) -> PullRequestRef {
    let url = pr
        .html_url
        .as_ref()
        .map(|u| u.to_string())
        .unwrap_or_else(|| {
            format!(
                "https://github.com/{}/pull/{}",
                upstream.full_name(),
                pr.number
            )
        });

    PullRequestRef {
        number: pr.number,
        url,
    }
}

fn is_not_found(error: &octocrab::Error) -> bool {
    match error {
        octocrab::Error::GitHub { source, .. } => source.status_code.as_u16() == 404,
        _ => false,
    }
}
