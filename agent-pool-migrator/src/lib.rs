#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod branches;
pub mod clients;
pub mod config;
pub mod pull_requests;
pub mod rate_limit;
pub mod runner;
pub mod substitution;
pub mod summary;
pub mod templates;

pub use branches::{BranchError, BranchJob, BranchProcessor};
pub use clients::{
    GitCli, GitError, GitHubClient, NewPullRequest, PullRequestRef, RepositoryClient,
    ReviewClient, ReviewError, FORK_REMOTE, ORIGIN_REMOTE,
};
pub use config::{
    migration_branch_name, parse_arguments, parse_repository_list, split_list, ConfigError,
    MigrationPlan, MigrationSettings, PoolMapping, RepositoryId, MIGRATION_BRANCH_PREFIX,
};
pub use pull_requests::{PrError, PrPublisher, PrStatus};
pub use rate_limit::{
    check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo,
};
pub use runner::{RepositoryError, Runner, RunnerConfig, RunnerError, DEFAULT_LOG_FILE};
pub use substitution::{
    ChangeSet, Substitution, SubstitutionEngine, SubstitutionError, SubstitutionMode,
    SubstitutionReport,
};
pub use summary::{
    format_report, MigrationResult, Outcome, RepositoryReport, RunLog, RunSummary, Stage,
};
pub use templates::{create_handlebars_registry, TemplateError, TemplateRenderer};
