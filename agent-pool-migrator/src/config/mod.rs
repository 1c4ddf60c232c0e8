//! Run configuration loading.
//!
//! This module turns the raw command line and environment-provided lists into
//! a validated [`MigrationPlan`] and repository lists, and loads the optional
//! settings file.

mod error;
mod mapping;
mod repository;
mod settings;

pub use error::ConfigError;
pub use mapping::{PoolMapping, MAPPING_SEPARATOR};
pub use repository::RepositoryId;
pub use settings::{
    default_candidate_paths, default_commit_message, default_pr_body_template,
    default_pr_title_format, MigrationSettings,
};

use bstr::ByteSlice;
use std::collections::HashSet;
use tracing::debug;

/// Prefix of every migration branch name.
pub const MIGRATION_BRANCH_PREFIX: &str = "migrate-agent-pool-";

/// The pool mappings and branches requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Pool renames, in the order they were supplied.
    pub mappings: Vec<PoolMapping>,

    /// Branches to migrate, in the order they were supplied.
    pub branches: Vec<String>,
}

/// Classifies raw arguments into pool mappings and branch names.
///
/// Any argument containing [`MAPPING_SEPARATOR`] is a mapping; everything else
/// is a branch. Arguments may be intermixed in any order.
///
/// # Errors
///
/// Returns [`ConfigError::NoMappings`] or [`ConfigError::NoBranches`] when
/// either set ends up empty, and a validation error for malformed entries.
pub fn parse_arguments<I, S>(args: I) -> Result<MigrationPlan, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut mappings = Vec::new();
    let mut branches = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        match PoolMapping::parse(arg) {
            Some(mapping) => {
                mapping
                    .validate()
                    .map_err(|message| ConfigError::InvalidMapping {
                        argument: arg.to_string(),
                        message,
                    })?;
                mappings.push(mapping);
            }
            None => {
                validate_branch_name(arg)?;
                branches.push(arg.to_string());
            }
        }
    }

    if mappings.is_empty() {
        return Err(ConfigError::NoMappings);
    }
    if branches.is_empty() {
        return Err(ConfigError::NoBranches);
    }

    debug!(
        mappings = mappings.len(),
        branches = branches.len(),
        "Parsed migration arguments"
    );
    Ok(MigrationPlan { mappings, branches })
}

/// Splits a comma and/or whitespace separated list into its entries.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses the target repository list.
///
/// Repeated entries are dropped, keeping the first occurrence, so every
/// repository gets exactly one working directory per run.
///
/// # Errors
///
/// Returns [`ConfigError::NoRepositories`] if the list is empty, or
/// [`ConfigError::InvalidRepository`] for an entry not in `owner/name` form.
pub fn parse_repository_list(raw: &str) -> Result<Vec<RepositoryId>, ConfigError> {
    let mut seen = HashSet::new();
    let mut repositories = Vec::new();

    for entry in split_list(raw) {
        let repository = entry
            .parse::<RepositoryId>()
            .map_err(|message| ConfigError::InvalidRepository {
                identifier: entry.clone(),
                message,
            })?;

        if seen.insert(repository.clone()) {
            repositories.push(repository);
        } else {
            debug!(repo = %repository, "Ignoring duplicate repository");
        }
    }

    if repositories.is_empty() {
        return Err(ConfigError::NoRepositories);
    }
    Ok(repositories)
}

/// Derives the migration branch name for a target branch.
#[must_use]
pub fn migration_branch_name(branch: &str) -> String {
    format!("{MIGRATION_BRANCH_PREFIX}{branch}")
}

fn validate_branch_name(branch: &str) -> Result<(), ConfigError> {
    gix_validate::reference::name_partial(branch.as_bytes().as_bstr())
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidBranch {
            branch: branch.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_mappings_and_branches() {
        let plan = parse_arguments(["pool1:poolA", "master", "pool2:poolB", "202505"]).unwrap();

        assert_eq!(
            plan.mappings,
            vec![
                PoolMapping::new("pool1", "poolA"),
                PoolMapping::new("pool2", "poolB")
            ]
        );
        assert_eq!(plan.branches, vec!["master", "202505"]);
    }

    #[test]
    fn requires_a_mapping() {
        let result = parse_arguments(["master"]);
        assert!(matches!(result, Err(ConfigError::NoMappings)));
    }

    #[test]
    fn requires_a_branch() {
        let result = parse_arguments(["pool1:poolA"]);
        assert!(matches!(result, Err(ConfigError::NoBranches)));
    }

    #[test]
    fn rejects_empty_old_name() {
        let result = parse_arguments([":poolA", "master"]);
        assert!(matches!(result, Err(ConfigError::InvalidMapping { .. })));
    }

    #[test]
    fn rejects_invalid_branch_name() {
        let result = parse_arguments(["pool1:poolA", "bad..branch"]);
        assert!(matches!(result, Err(ConfigError::InvalidBranch { .. })));
    }

    #[test]
    fn accepts_nested_branch_name() {
        let plan = parse_arguments(["pool1:poolA", "release/2025.05"]).unwrap();
        assert_eq!(plan.branches, vec!["release/2025.05"]);
    }

    #[test]
    fn parses_repository_list_with_mixed_separators() {
        let repos = parse_repository_list("org/one, org/two\norg/three").unwrap();
        let names: Vec<_> = repos.iter().map(RepositoryId::full_name).collect();
        assert_eq!(names, vec!["org/one", "org/two", "org/three"]);
    }

    #[test]
    fn drops_duplicate_repositories_in_order() {
        let repos = parse_repository_list("org/two org/one, org/two org/one org/three").unwrap();
        let names: Vec<_> = repos.iter().map(RepositoryId::full_name).collect();
        assert_eq!(names, vec!["org/two", "org/one", "org/three"]);
    }

    #[test]
    fn empty_repository_list_is_an_error() {
        let result = parse_repository_list(" , ");
        assert!(matches!(result, Err(ConfigError::NoRepositories)));
    }

    #[test]
    fn invalid_repository_entry_is_an_error() {
        let result = parse_repository_list("org/one not-a-repo");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRepository { identifier, .. }) if identifier == "not-a-repo"
        ));
    }

    #[test]
    fn derives_migration_branch_name() {
        assert_eq!(migration_branch_name("202505"), "migrate-agent-pool-202505");
    }
}
