//! Substitution error types.

use std::path::PathBuf;
use thiserror::Error;

/// A failure isolated to a single candidate file.
///
/// Never aborts a substitution pass; it is logged and reported next to the
/// resulting change set.
#[derive(Debug, Error)]
pub enum SubstitutionError {
    /// The candidate file could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The substituted content could not be written back.
    #[error("Failed to write '{}' for pool '{old_name}': {source}", path.display())]
    Write {
        path: PathBuf,
        old_name: String,
        #[source]
        source: std::io::Error,
    },
}
