//! Pool name substitution in pipeline YAML files.
//!
//! Only a fixed allowlist of files and folders is scanned; this is not a
//! general repository walk. Failures are isolated per file so one unreadable
//! or unwritable file never aborts the pass.

mod change_set;
mod error;
mod strategy;

pub use change_set::{ChangeSet, SubstitutionReport};
pub use error::SubstitutionError;
pub use strategy::{LiteralSubstitution, ScalarSubstitution, Substitution, SubstitutionMode};

use crate::config::PoolMapping;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File extensions treated as YAML.
const YAML_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Rewrites pool names in the candidate files of a working tree.
pub struct SubstitutionEngine {
    candidates: Vec<PathBuf>,
    strategy: Box<dyn Substitution>,
}

impl fmt::Debug for SubstitutionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstitutionEngine")
            .field("candidates", &self.candidates)
            .finish_non_exhaustive()
    }
}

impl SubstitutionEngine {
    /// Creates an engine for the given allowlist and mode.
    #[must_use]
    pub fn new(candidates: Vec<PathBuf>, mode: SubstitutionMode) -> Self {
        Self::with_strategy(candidates, mode.strategy())
    }

    /// Creates an engine with a custom strategy.
    #[must_use]
    pub fn with_strategy(candidates: Vec<PathBuf>, strategy: Box<dyn Substitution>) -> Self {
        Self {
            candidates,
            strategy,
        }
    }

    /// Lists candidate YAML files under `root`, relative to it.
    ///
    /// File entries count when they have a YAML extension; folder entries are
    /// walked recursively. Missing entries and symlinks are skipped.
    #[must_use]
    pub fn candidate_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = BTreeSet::new();

        for candidate in &self.candidates {
            let path = root.join(candidate);
            let Ok(metadata) = std::fs::symlink_metadata(&path) else {
                continue;
            };

            if metadata.is_file() {
                if is_yaml(candidate) {
                    files.insert(candidate.clone());
                }
            } else if metadata.is_dir() {
                collect_yaml_files(&path, candidate, &mut files);
            }
        }

        files.into_iter().collect()
    }

    /// Applies every mapping to every candidate file under `root`.
    ///
    /// Files are rewritten in place. Returns the resulting change set together
    /// with any file-level failures.
    pub fn run(&self, root: &Path, mappings: &[PoolMapping]) -> SubstitutionReport {
        let mut report = SubstitutionReport::default();

        for relative in self.candidate_files(root) {
            let path = root.join(&relative);

            for mapping in mappings {
                let content = match std::fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(file = %relative.display(), error = %e, "Failed to read candidate file");
                        report.failures.push(SubstitutionError::Read {
                            path: relative.clone(),
                            source: e,
                        });
                        break;
                    }
                };

                let Some(updated) = self.strategy.apply(&content, mapping) else {
                    continue;
                };

                match std::fs::write(&path, updated) {
                    Ok(()) => {
                        debug!(file = %relative.display(), %mapping, "Replaced pool name");
                        report.change_set.insert(relative.clone());
                    }
                    Err(e) => {
                        warn!(
                            file = %relative.display(),
                            %mapping,
                            error = %e,
                            "Failed to write substituted file"
                        );
                        report.failures.push(SubstitutionError::Write {
                            path: relative.clone(),
                            old_name: mapping.old_name.clone(),
                            source: e,
                        });
                    }
                }
            }
        }

        report
    }
}

/// Recursively collects YAML files below `dir`.
fn collect_yaml_files(dir: &Path, relative: &Path, files: &mut BTreeSet<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %relative.display(), error = %e, "Failed to read candidate folder");
            return;
        }
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let child = relative.join(entry.file_name());

        if file_type.is_dir() {
            collect_yaml_files(&entry.path(), &child, files);
        } else if file_type.is_file() && is_yaml(&child) {
            files.insert(child);
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            YAML_EXTENSIONS
                .iter()
                .any(|yaml| ext.eq_ignore_ascii_case(yaml))
        })
}
