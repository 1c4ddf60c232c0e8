//! Append-only run log.

use super::RepositoryReport;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Trailing separator written after each repository block.
const SEPARATOR: &str = "---";

/// Durable audit trail of a run, one block per repository.
///
/// The file is only ever appended to and never read back.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Opens (or creates) the log file for appending.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one repository block in a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn append(&mut self, report: &RepositoryReport) -> io::Result<()> {
        self.file.write_all(format_report(report).as_bytes())?;
        self.file.flush()
    }
}

/// Formats a repository block: header, one line per branch, separator.
#[must_use]
pub fn format_report(report: &RepositoryReport) -> String {
    let mut block = format!("=== {} ===\n", report.repository);
    for result in &report.results {
        block.push_str(&format!("{}: {}\n", result.branch, result.outcome));
    }
    block.push_str(SEPARATOR);
    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{MigrationResult, Outcome};
    use tempfile::TempDir;

    fn report(repository: &str, outcomes: Vec<(&str, Outcome)>) -> RepositoryReport {
        RepositoryReport {
            repository: repository.to_string(),
            results: outcomes
                .into_iter()
                .map(|(branch, outcome)| MigrationResult {
                    repository: repository.to_string(),
                    branch: branch.to_string(),
                    outcome,
                })
                .collect(),
        }
    }

    #[test]
    fn formats_repository_block() {
        let block = format_report(&report(
            "org/repo",
            vec![
                (
                    "master",
                    Outcome::PrCreated {
                        url: "https://github.com/org/repo/pull/7".to_string(),
                    },
                ),
                ("202505", Outcome::NoChanges),
            ],
        ));

        assert_eq!(
            block,
            "=== org/repo ===\nmaster: pr-created https://github.com/org/repo/pull/7\n202505: no-changes\n---\n"
        );
    }

    #[test]
    fn appends_without_truncating() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.log");
        std::fs::write(&path, "previous run\n").unwrap();

        let mut log = RunLog::open(&path).unwrap();
        log.append(&report("org/one", vec![("master", Outcome::Skipped)]))
            .unwrap();
        log.append(&report("org/two", vec![("master", Outcome::BranchMissing)]))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "previous run\n=== org/one ===\nmaster: skipped\n---\n=== org/two ===\nmaster: branch-missing\n---\n"
        );
    }
}
