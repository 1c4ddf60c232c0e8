//! Per-branch migration.
//!
//! For each requested branch the processor syncs it with origin, creates a
//! fresh migration branch, runs the substitution engine and, when anything
//! changed, commits and hands off to the [`PrPublisher`]. Every failure is
//! turned into a [`Outcome::Failed`] for that branch only.

mod error;
mod job;

pub use error::BranchError;
pub use job::BranchJob;

use crate::clients::{RepositoryClient, FORK_REMOTE, ORIGIN_REMOTE};
use crate::config::{MigrationPlan, MigrationSettings, RepositoryId};
use crate::pull_requests::{PrPublisher, PrStatus};
use crate::substitution::SubstitutionEngine;
use crate::summary::Outcome;
use std::path::Path;
use tracing::{debug, error, info, info_span, Instrument};

/// Migrates branches inside one repository's working copy.
pub struct BranchProcessor<'a> {
    git: &'a dyn RepositoryClient,
    publisher: PrPublisher<'a>,
    engine: &'a SubstitutionEngine,
    plan: &'a MigrationPlan,
    settings: &'a MigrationSettings,
    dry_run: bool,
}

impl<'a> BranchProcessor<'a> {
    /// Creates a processor.
    ///
    /// In dry-run mode nothing is committed or pushed and the fork remote is
    /// never consulted.
    pub fn new(
        git: &'a dyn RepositoryClient,
        publisher: PrPublisher<'a>,
        engine: &'a SubstitutionEngine,
        plan: &'a MigrationPlan,
        settings: &'a MigrationSettings,
        dry_run: bool,
    ) -> Self {
        Self {
            git,
            publisher,
            engine,
            plan,
            settings,
            dry_run,
        }
    }

    /// Migrates one branch and reports its outcome. Never fails.
    pub async fn process(&self, workdir: &Path, repository: &RepositoryId, branch: &str) -> Outcome {
        let job = BranchJob::new(repository.clone(), branch);
        let span = info_span!("branch", branch = %job.branch);

        async {
            match self.migrate(workdir, &job).await {
                Ok(outcome) => {
                    info!(outcome = %outcome, "Branch processed");
                    outcome
                }
                Err(e) => {
                    let stage = e.stage();
                    error!(%stage, error = %e, "Branch migration failed");
                    Outcome::Failed {
                        stage,
                        error: e.to_string(),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn migrate(&self, workdir: &Path, job: &BranchJob) -> Result<Outcome, BranchError> {
        if !self
            .git
            .remote_branch_exists(workdir, ORIGIN_REMOTE, &job.branch)
            .await
            .map_err(BranchError::LookupFailed)?
        {
            info!("Branch does not exist on origin");
            return Ok(Outcome::BranchMissing);
        }

        self.git
            .checkout_remote_branch(workdir, ORIGIN_REMOTE, &job.branch)
            .await
            .map_err(BranchError::SyncFailed)?;

        // A leftover local branch would shadow the regenerated one
        if !self.dry_run
            && self
                .git
                .remote_branch_exists(workdir, FORK_REMOTE, &job.migration_branch)
                .await
                .map_err(BranchError::BranchFailed)?
        {
            debug!(migration_branch = %job.migration_branch, "Deleting stale local branch");
            self.git
                .delete_local_branch(workdir, &job.migration_branch)
                .await
                .map_err(BranchError::BranchFailed)?;
        }

        self.git
            .create_branch(workdir, &job.migration_branch)
            .await
            .map_err(BranchError::BranchFailed)?;

        let report = self.engine.run(workdir, &self.plan.mappings);
        if !report.failures.is_empty() {
            info!(
                failures = report.failures.len(),
                "Some candidate files were skipped"
            );
        }

        if report.change_set.is_empty() {
            return Ok(Outcome::NoChanges);
        }
        debug!(files = report.change_set.len(), "Substituted pool names");

        if self.dry_run {
            return Ok(Outcome::DryRun {
                files: report.change_set.iter().map(Path::to_path_buf).collect(),
            });
        }

        let staged = self
            .git
            .stage_modified(workdir)
            .await
            .map_err(BranchError::StageFailed)?;
        if staged.is_empty() {
            return Ok(Outcome::NoChanges);
        }

        self.git
            .commit(workdir, &self.settings.commit_message)
            .await
            .map_err(BranchError::CommitFailed)?;

        let status = self.publisher.publish(workdir, job).await?;
        let url = status.pull_request().url.clone();
        debug!(status = status.as_str(), %url, "Migration branch published");

        Ok(match status {
            PrStatus::Created(_) => Outcome::PrCreated { url },
            PrStatus::Updated(_) => Outcome::PrUpdated { url },
        })
    }
}
