//! CLI for the Agent Pool Migrator.
//!
//! Replaces Azure Pipelines agent pool names across GitHub repositories and
//! opens one pull request per migrated branch.

use agent_pool_migrator::{
    ConfigError, MigrationSettings, RunSummary, Runner, RunnerConfig, RunnerError,
    DEFAULT_LOG_FILE,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Agent Pool Migrator - Rename CI agent pools across repositories via pull requests.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pool mappings (`OLD:NEW`) and branch names, in any order.
    #[arg(required = true, value_name = "TARGETS")]
    targets: Vec<String>,

    /// GitHub user owning the forks and authoring commits.
    #[arg(long, env = "GITHUB_USER")]
    user: String,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Repositories to migrate (`owner/name`, comma or whitespace separated).
    #[arg(long, env = "MIGRATION_REPOSITORIES", default_value = "")]
    repositories: String,

    /// Repositories to skip, matched exactly.
    #[arg(long, env = "MIGRATION_SKIP_REPOSITORIES")]
    skip_repositories: Option<String>,

    /// Path to a TOML settings file.
    #[arg(long, env = "MIGRATION_SETTINGS")]
    settings: Option<PathBuf>,

    /// Append-only run log.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Clone repositories here instead of a temporary directory.
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Substitute only, without forking, committing, pushing or opening PRs.
    #[arg(long)]
    dry_run: bool,

    /// Maximum repositories processed at once.
    #[arg(long, default_value_t = 1)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    install_crypto_provider();

    let args = Args::parse();

    // Per-branch failures are in the summary and the run log
    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Installs aws-lc-rs as the process-wide rustls crypto provider.
///
/// The GitHub client's TLS stack resolves the provider from the process
/// default, so this runs before any client is built.
fn install_crypto_provider() {
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}

/// Builds the runner configuration from parsed arguments.
fn build_config(args: Args) -> Result<RunnerConfig, ConfigError> {
    let settings = match &args.settings {
        Some(path) => MigrationSettings::load(path)?,
        None => MigrationSettings::default(),
    };

    let mut config = RunnerConfig::from_inputs(
        &args.targets,
        &args.repositories,
        args.skip_repositories.as_deref(),
        args.user,
        args.token,
    )?
    .with_settings(settings)
    .with_log_path(args.log_file)
    .with_dry_run(args.dry_run)
    .with_concurrency(args.concurrency);

    if let Some(work_dir) = args.work_dir {
        config = config.with_work_dir(work_dir);
    }
    Ok(config)
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = build_config(args)?;
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!(
        "  Repositories processed: {}",
        summary.repositories_processed
    );
    println!("  Skipped: {}", summary.skipped);
    println!("  Branches missing: {}", summary.branches_missing);
    println!("  No changes: {}", summary.no_changes);

    if summary.dry_run {
        println!("  Would change: {}", summary.would_change);
    } else {
        println!("  PRs created: {}", summary.prs_created);
        println!("  PRs updated: {}", summary.prs_updated);
    }
    println!("  Failed: {}", summary.failed);

    let mut published = summary.published().peekable();
    if published.peek().is_some() {
        println!("\nPull requests:");
        for result in published {
            if let Some(url) = result.outcome.url() {
                println!(
                    "  {} {} ({}): {url}",
                    result.repository,
                    result.branch,
                    result.outcome.as_str()
                );
            }
        }
    }
}
