//! Orchestrates an agent pool migration across repositories.

mod config;
mod error;

pub use config::{RunnerConfig, DEFAULT_LOG_FILE};
pub use error::{RepositoryError, RunnerError};

use crate::branches::BranchProcessor;
use crate::clients::{
    GitCli, GitHubClient, RepositoryClient, ReviewClient, ReviewError, FORK_REMOTE, ORIGIN_REMOTE,
};
use crate::config::RepositoryId;
use crate::pull_requests::PrPublisher;
use crate::substitution::SubstitutionEngine;
use crate::summary::{MigrationResult, Outcome, RepositoryReport, RunLog, RunSummary};
use crate::templates::TemplateRenderer;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// How many times a new fork is polled before giving up.
const FORK_READY_ATTEMPTS: u32 = 10;

/// Delay between fork readiness checks.
const FORK_READY_INTERVAL: Duration = Duration::from_secs(3);

/// Orchestrates a full migration run.
pub struct Runner {
    config: RunnerConfig,
    git: Arc<dyn RepositoryClient>,
    review: Arc<dyn ReviewClient>,
    engine: SubstitutionEngine,
    renderer: TemplateRenderer,
}

impl Runner {
    /// Builds a runner using git and the GitHub API.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let review = GitHubClient::new(config.token().to_string())?;
        let git = GitCli::new(config.token());
        Ok(Self::with_clients(config, Arc::new(git), Arc::new(review)))
    }

    /// Builds a runner over the given clients.
    pub fn with_clients(
        config: RunnerConfig,
        git: Arc<dyn RepositoryClient>,
        review: Arc<dyn ReviewClient>,
    ) -> Self {
        let settings = config.settings();
        let engine = SubstitutionEngine::new(
            settings.candidate_paths.clone(),
            settings.substitution_mode,
        );
        Self {
            config,
            git,
            review,
            engine,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Executes the full orchestration flow.
    ///
    /// Individual repository and branch failures are recorded in the summary
    /// and the run log; only setup errors are returned.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());

        let mut log = RunLog::open(self.config.log_path()).map_err(|e| RunnerError::Log {
            path: self.config.log_path().to_path_buf(),
            source: e,
        })?;

        // Removed on drop at the end of the run
        let (_temp_root, root) = self.work_root()?;
        info!(
            root = %root.display(),
            log = %log.path().display(),
            repositories = self.config.repositories().len(),
            branches = self.config.plan().branches.len(),
            "Starting migration"
        );

        let root = root.as_path();
        let mut reports = stream::iter(self.config.repositories())
            .map(|repository| self.process_repository(repository, root))
            .buffered(self.config.concurrency());

        while let Some(report) = reports.next().await {
            if let Err(e) = log.append(&report) {
                warn!(repo = %report.repository, error = %e, "Failed to append to run log");
            }
            summary.record_report(&report);
        }

        Ok(summary)
    }

    fn work_root(&self) -> Result<(Option<TempDir>, PathBuf), RunnerError> {
        match self.config.work_dir() {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(RunnerError::WorkRoot)?;
                Ok((None, dir.to_path_buf()))
            }
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("agent-pool-migration-")
                    .tempdir()
                    .map_err(RunnerError::WorkRoot)?;
                let path = temp.path().to_path_buf();
                Ok((Some(temp), path))
            }
        }
    }

    async fn process_repository(&self, repository: &RepositoryId, root: &Path) -> RepositoryReport {
        let span = info_span!("repository", repo = %repository);

        async {
            if self.config.is_skipped(repository) {
                info!("Repository is on the skip list");
                return self.uniform_report(repository, Outcome::Skipped);
            }

            let workdir = root.join(format!("{}__{}", repository.owner, repository.name));
            if let Err(e) = self.prepare_repository(repository, &workdir).await {
                let stage = e.stage();
                error!(%stage, error = %e, "Failed to prepare repository");
                return self.uniform_report(
                    repository,
                    Outcome::Failed {
                        stage,
                        error: e.to_string(),
                    },
                );
            }

            let processor = self.branch_processor();
            let mut results = Vec::with_capacity(self.config.plan().branches.len());
            for branch in &self.config.plan().branches {
                let outcome = processor.process(&workdir, repository, branch).await;
                results.push(MigrationResult {
                    repository: repository.full_name(),
                    branch: branch.clone(),
                    outcome,
                });
            }

            RepositoryReport {
                repository: repository.full_name(),
                results,
            }
        }
        .instrument(span)
        .await
    }

    /// Clones the repository and wires up the fork before any branch work.
    async fn prepare_repository(
        &self,
        repository: &RepositoryId,
        workdir: &Path,
    ) -> Result<(), RepositoryError> {
        if workdir.exists() {
            std::fs::remove_dir_all(workdir).map_err(|e| RepositoryError::WorkDir {
                path: workdir.to_path_buf(),
                source: e,
            })?;
        }

        info!("Cloning repository");
        self.git
            .clone_repository(repository, workdir)
            .await
            .map_err(RepositoryError::Clone)?;
        self.git
            .configure_identity(workdir, self.config.user(), &self.config.commit_email())
            .await
            .map_err(RepositoryError::Identity)?;
        self.git
            .fetch(workdir, ORIGIN_REMOTE)
            .await
            .map_err(RepositoryError::Fetch)?;

        if self.config.dry_run() {
            debug!("Dry run, not touching the fork");
            return Ok(());
        }

        self.ensure_fork(repository)
            .await
            .map_err(RepositoryError::Fork)?;
        self.git
            .add_remote(
                workdir,
                FORK_REMOTE,
                &repository.with_owner(self.config.user()),
            )
            .await
            .map_err(RepositoryError::Remote)?;
        self.git
            .fetch(workdir, FORK_REMOTE)
            .await
            .map_err(RepositoryError::Fetch)?;

        Ok(())
    }

    /// Creates the user's fork if missing and waits until it is visible.
    async fn ensure_fork(&self, repository: &RepositoryId) -> Result<(), ReviewError> {
        let user = self.config.user();
        if self.review.fork_exists(repository, user).await? {
            debug!("Fork already exists");
            return Ok(());
        }

        info!(owner = %user, "Creating fork");
        self.review.create_fork(repository).await?;

        for attempt in 1..=FORK_READY_ATTEMPTS {
            if self.review.fork_exists(repository, user).await? {
                return Ok(());
            }
            if attempt < FORK_READY_ATTEMPTS {
                debug!(attempt, "Fork not ready yet");
                tokio::time::sleep(FORK_READY_INTERVAL).await;
            }
        }

        Err(ReviewError::ForkNotReady {
            repository: repository.with_owner(user).full_name(),
            attempts: FORK_READY_ATTEMPTS,
        })
    }

    fn branch_processor(&self) -> BranchProcessor<'_> {
        let publisher = PrPublisher::new(
            self.git.as_ref(),
            self.review.as_ref(),
            &self.renderer,
            self.config.settings(),
            self.config.plan(),
            self.config.user(),
        );
        BranchProcessor::new(
            self.git.as_ref(),
            publisher,
            &self.engine,
            self.config.plan(),
            self.config.settings(),
            self.config.dry_run(),
        )
    }

    /// Records the same outcome for every requested branch.
    fn uniform_report(&self, repository: &RepositoryId, outcome: Outcome) -> RepositoryReport {
        RepositoryReport {
            repository: repository.full_name(),
            results: self
                .config
                .plan()
                .branches
                .iter()
                .map(|branch| MigrationResult {
                    repository: repository.full_name(),
                    branch: branch.clone(),
                    outcome: outcome.clone(),
                })
                .collect(),
        }
    }
}
