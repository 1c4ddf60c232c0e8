//! Pull request publishing for migration branches.
//!
//! This module force-pushes a committed migration branch to the user's fork
//! and opens a pull request against the original branch, or reuses the one
//! already open for the same head and base.

mod error;
mod status;

pub use error::PrError;
pub use status::PrStatus;

use crate::branches::BranchJob;
use crate::clients::{NewPullRequest, RepositoryClient, ReviewClient, FORK_REMOTE};
use crate::config::{MigrationPlan, MigrationSettings};
use crate::templates::TemplateRenderer;
use std::path::Path;
use tracing::{debug, info};

/// Pushes migration branches and opens pull requests for them.
pub struct PrPublisher<'a> {
    git: &'a dyn RepositoryClient,
    review: &'a dyn ReviewClient,
    renderer: &'a TemplateRenderer,
    settings: &'a MigrationSettings,
    plan: &'a MigrationPlan,
    user: &'a str,
}

impl<'a> PrPublisher<'a> {
    /// Creates a publisher pushing to `user`'s forks.
    pub fn new(
        git: &'a dyn RepositoryClient,
        review: &'a dyn ReviewClient,
        renderer: &'a TemplateRenderer,
        settings: &'a MigrationSettings,
        plan: &'a MigrationPlan,
        user: &'a str,
    ) -> Self {
        Self {
            git,
            review,
            renderer,
            settings,
            plan,
            user,
        }
    }

    /// Publishes a committed migration branch.
    ///
    /// This function:
    /// 1. Force-pushes the migration branch to the fork
    /// 2. Looks for an open PR with the same head and base
    /// 3. Creates a PR if there is none
    ///
    /// An existing PR is left untouched; the push is what updates it.
    ///
    /// # Errors
    ///
    /// Returns [`PrError`] if the push, lookup, rendering, or creation fails.
    pub async fn publish(&self, workdir: &Path, job: &BranchJob) -> Result<PrStatus, PrError> {
        debug!(migration_branch = %job.migration_branch, "Pushing migration branch");
        self.git
            .push(workdir, FORK_REMOTE, &job.migration_branch)
            .await
            .map_err(PrError::PushFailed)?;

        if let Some(existing) = self
            .review
            .find_open_pull_request(
                &job.repository,
                self.user,
                &job.migration_branch,
                &job.branch,
            )
            .await?
        {
            info!(pr_number = existing.number, "Updated existing PR");
            return Ok(PrStatus::Updated(existing));
        }

        let request = NewPullRequest {
            title: self
                .renderer
                .render_pr_title(&self.settings.pr_title_format, &job.branch)?,
            head: format!("{}:{}", self.user, job.migration_branch),
            base: job.branch.clone(),
            body: self.renderer.render_pr_body(
                &self.settings.pr_body_template,
                &self.plan.mappings,
                &self.plan.branches,
                &job.branch,
            )?,
        };

        let created = self
            .review
            .create_pull_request(&job.repository, &request)
            .await?;
        info!(pr_number = created.number, "PR created successfully");

        Ok(PrStatus::Created(created))
    }
}
