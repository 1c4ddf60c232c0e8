//! Run summary, per-branch results and the append-only run log.

mod log;
mod result;
mod run_summary;

pub use log::{format_report, RunLog};
pub use result::{MigrationResult, Outcome, Stage};
pub use run_summary::{RepositoryReport, RunSummary};
