//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading the run configuration.
///
/// These are the only errors that abort a run before any repository work.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `OLD:NEW` pool mapping was supplied.
    #[error("No pool mappings supplied (expected at least one OLD:NEW argument)")]
    NoMappings,

    /// No branch name was supplied.
    #[error("No branches supplied (expected at least one branch name argument)")]
    NoBranches,

    /// The target repository list is empty.
    #[error("No target repositories configured")]
    NoRepositories,

    /// A required value is empty.
    #[error("Missing required value: {name}")]
    MissingValue { name: &'static str },

    /// A mapping argument could not be used.
    #[error("Invalid pool mapping '{argument}': {message}")]
    InvalidMapping { argument: String, message: String },

    /// A branch argument is not a valid git branch name.
    #[error("Invalid branch name '{branch}': {message}")]
    InvalidBranch { branch: String, message: String },

    /// A repository identifier is not in `owner/name` form.
    #[error("Invalid repository identifier '{identifier}': {message}")]
    InvalidRepository { identifier: String, message: String },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse settings file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in the settings file.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },
}
