//! Runner configuration.

use crate::config::{
    parse_arguments, parse_repository_list, split_list, ConfigError, MigrationPlan,
    MigrationSettings, RepositoryId,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default run log file name.
pub const DEFAULT_LOG_FILE: &str = "agent-pool-migration.log";

/// Configuration for running a migration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Pool mappings and branches.
    plan: MigrationPlan,
    /// Repositories to process, in order.
    repositories: Vec<RepositoryId>,
    /// Repository identifiers to skip (exact match).
    skip: HashSet<String>,
    /// Identity owning forks and authoring commits.
    user: String,
    /// GitHub token used for API calls and git transport.
    token: String,
    /// Shared run settings.
    settings: MigrationSettings,
    /// Append-only run log path.
    log_path: PathBuf,
    /// Whether to stop before committing.
    dry_run: bool,
    /// Maximum repositories processed at once.
    concurrency: usize,
    /// Clone root; a temporary directory when unset.
    work_dir: Option<PathBuf>,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    ///
    /// Repeated repositories are dropped, keeping the first occurrence.
    pub fn new(
        plan: MigrationPlan,
        mut repositories: Vec<RepositoryId>,
        user: String,
        token: String,
    ) -> Self {
        let mut seen = HashSet::new();
        repositories.retain(|repository| seen.insert(repository.clone()));

        Self {
            plan,
            repositories,
            skip: HashSet::new(),
            user,
            token,
            settings: MigrationSettings::default(),
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            dry_run: false,
            concurrency: 1,
            work_dir: None,
        }
    }

    /// Builds a configuration from raw command line and environment input.
    ///
    /// # Arguments
    ///
    /// * `targets` - Mixed `OLD:NEW` mappings and branch names
    /// * `repositories` - Comma/whitespace separated target repositories
    /// * `skip` - Comma/whitespace separated repositories to skip
    /// * `user` - Fork owner and commit identity
    /// * `token` - GitHub token
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any input is missing or malformed.
    pub fn from_inputs<I, S>(
        targets: I,
        repositories: &str,
        skip: Option<&str>,
        user: String,
        token: String,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let plan = parse_arguments(targets)?;
        let repositories = parse_repository_list(repositories)?;

        if user.trim().is_empty() {
            return Err(ConfigError::MissingValue { name: "user" });
        }
        if token.trim().is_empty() {
            return Err(ConfigError::MissingValue { name: "token" });
        }

        let config = Self::new(plan, repositories, user, token);
        Ok(match skip {
            Some(skip) => config.with_skip_list(split_list(skip)),
            None => config,
        })
    }

    /// Sets repositories to skip.
    pub fn with_skip_list(mut self, skip: impl IntoIterator<Item = String>) -> Self {
        self.skip = skip.into_iter().collect();
        self
    }

    /// Sets run settings.
    pub fn with_settings(mut self, settings: MigrationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets a custom run log path.
    pub fn with_log_path(mut self, log_path: PathBuf) -> Self {
        self.log_path = log_path;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets how many repositories are processed at once (at least one).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Uses a fixed clone root instead of a temporary directory.
    pub fn with_work_dir(mut self, work_dir: PathBuf) -> Self {
        self.work_dir = Some(work_dir);
        self
    }

    /// Returns the migration plan.
    pub fn plan(&self) -> &MigrationPlan {
        &self.plan
    }

    /// Returns the target repositories.
    pub fn repositories(&self) -> &[RepositoryId] {
        &self.repositories
    }

    /// Returns true if the repository is on the skip list.
    pub fn is_skipped(&self, repository: &RepositoryId) -> bool {
        self.skip.contains(&repository.full_name())
    }

    /// Returns the fork owner and commit identity.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the run settings.
    pub fn settings(&self) -> &MigrationSettings {
        &self.settings
    }

    /// Returns the run log path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the max repositories processed at once.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the fixed clone root, if any.
    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    /// Email used for commits and sign-off trailers.
    pub fn commit_email(&self) -> String {
        format!("{}@users.noreply.github.com", self.user)
    }
}
