//! Run summary types.

use super::result::{MigrationResult, Outcome};

/// Results for every branch of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReport {
    /// Repository full name.
    pub repository: String,

    /// One result per requested branch, in request order.
    pub results: Vec<MigrationResult>,
}

/// Summary of a complete run.
///
/// Returned by the runner instead of being accumulated in shared state.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of repositories processed (including skipped ones).
    pub repositories_processed: usize,

    /// Number of pull requests opened.
    pub prs_created: usize,

    /// Number of existing pull requests updated by force-push.
    pub prs_updated: usize,

    /// Number of branches without any pool name to replace.
    pub no_changes: usize,

    /// Number of branches missing on origin.
    pub branches_missing: usize,

    /// Number of branches in skipped repositories.
    pub skipped: usize,

    /// Number of branches that failed.
    pub failed: usize,

    /// Number of branches that would change in a dry run.
    pub would_change: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Every branch result, in processing order.
    pub results: Vec<MigrationResult>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with one repository's results.
    pub fn record_report(&mut self, report: &RepositoryReport) {
        self.repositories_processed += 1;

        for result in &report.results {
            match &result.outcome {
                Outcome::Skipped => self.skipped += 1,
                Outcome::BranchMissing => self.branches_missing += 1,
                Outcome::NoChanges => self.no_changes += 1,
                Outcome::PrCreated { .. } => self.prs_created += 1,
                Outcome::PrUpdated { .. } => self.prs_updated += 1,
                Outcome::DryRun { .. } => self.would_change += 1,
                Outcome::Failed { .. } => self.failed += 1,
            }
            self.results.push(result.clone());
        }
    }

    /// Results with a created or updated pull request.
    pub fn published(&self) -> impl Iterator<Item = &MigrationResult> {
        self.results.iter().filter(|r| r.outcome.url().is_some())
    }

    /// Returns true if any branch failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
