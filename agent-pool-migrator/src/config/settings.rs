//! Run settings deserialization.

use crate::config::ConfigError;
use crate::substitution::SubstitutionMode;
use handlebars::Template;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Settings shared by every repository and branch in a run.
///
/// Loaded from an optional TOML file; every key has a default so an empty
/// file (or no file at all) yields [`MigrationSettings::default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MigrationSettings {
    /// Commit message for the substitution commit. A sign-off trailer is added.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Handlebars format for PR titles. Receives `branch`.
    #[serde(default = "default_pr_title_format")]
    pub pr_title_format: String,

    /// Handlebars template for PR bodies. Receives `mappings`, `branches` and `branch`.
    #[serde(default = "default_pr_body_template")]
    pub pr_body_template: String,

    /// Files and folders scanned for pipeline YAML, relative to the repository root.
    #[serde(default = "default_candidate_paths")]
    pub candidate_paths: Vec<PathBuf>,

    /// How pool names are replaced inside candidate files.
    #[serde(default)]
    pub substitution_mode: SubstitutionMode,
}

pub fn default_commit_message() -> String {
    "Migrate Azure Pipelines agent pools".to_string()
}

pub fn default_pr_title_format() -> String {
    "[{{branch}}] Migrate Azure Pipelines agent pools".to_string()
}

pub fn default_pr_body_template() -> String {
    r#"This pull request migrates Azure Pipelines agent pools.

Pool mappings:
{{#each mappings}}
- `{{old_name}}` -> `{{new_name}}`
{{/each}}

Branches included in this migration:
{{#each branches}}
- `{{this}}`{{#if (eq this ../branch)}} (this pull request){{/if}}
{{/each}}
"#
    .to_string()
}

pub fn default_candidate_paths() -> Vec<PathBuf> {
    [
        "azure-pipelines.yml",
        "azure-pipelines.yaml",
        ".azure-pipelines",
        "azure-pipelines",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            commit_message: default_commit_message(),
            pr_title_format: default_pr_title_format(),
            pr_body_template: default_pr_body_template(),
            candidate_paths: default_candidate_paths(),
            substitution_mode: SubstitutionMode::default(),
        }
    }
}

impl MigrationSettings {
    /// Loads and validates settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, malformed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading settings");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        settings.validate(path)?;
        Ok(settings)
    }

    /// Validates settings values.
    pub(crate) fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        if self.commit_message.trim().is_empty() {
            return Err(invalid("commit-message must not be empty".to_string()));
        }

        if self.pr_title_format.trim().is_empty() {
            return Err(invalid("pr-title-format must not be empty".to_string()));
        }

        for (key, template) in [
            ("pr-title-format", &self.pr_title_format),
            ("pr-body-template", &self.pr_body_template),
        ] {
            Template::compile(template)
                .map_err(|e| invalid(format!("{key} is not a valid template: {e}")))?;
        }

        if self.candidate_paths.is_empty() {
            return Err(invalid("candidate-paths must not be empty".to_string()));
        }

        // Candidates must stay inside the clone
        for candidate in &self.candidate_paths {
            let escapes = candidate.components().any(|c| {
                matches!(
                    c,
                    Component::ParentDir | Component::RootDir | Component::Prefix(_)
                )
            });
            if escapes || candidate.as_os_str().is_empty() {
                return Err(invalid(format!(
                    "candidate path must be relative to the repository root: {}",
                    candidate.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(&path, "").unwrap();

        let settings = MigrationSettings::load(&path).unwrap();

        assert_eq!(settings.commit_message, default_commit_message());
        assert_eq!(settings.candidate_paths, default_candidate_paths());
        assert_eq!(settings.substitution_mode, SubstitutionMode::Literal);
    }

    #[test]
    fn loads_custom_settings() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(
            &path,
            r#"
commit-message = "ci: move to new pools"
pr-title-format = "Pools for {{branch}}"
candidate-paths = [".ci", "pipeline.yml"]
substitution-mode = "scalar"
"#,
        )
        .unwrap();

        let settings = MigrationSettings::load(&path).unwrap();

        assert_eq!(settings.commit_message, "ci: move to new pools");
        assert_eq!(settings.pr_title_format, "Pools for {{branch}}");
        assert_eq!(
            settings.candidate_paths,
            vec![PathBuf::from(".ci"), PathBuf::from("pipeline.yml")]
        );
        assert_eq!(settings.substitution_mode, SubstitutionMode::Scalar);
        assert_eq!(settings.pr_body_template, default_pr_body_template());
    }

    #[test]
    fn rejects_escaping_candidate_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(&path, r#"candidate-paths = ["../outside"]"#).unwrap();

        let result = MigrationSettings::load(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn rejects_malformed_templates() {
        let temp = TempDir::new().unwrap();

        for content in [
            r#"pr-title-format = "{{#if branch}}unclosed""#,
            r#"pr-body-template = "{{#each mappings}}{{old_name}}""#,
        ] {
            let path = temp.path().join("settings.toml");
            fs::write(&path, content).unwrap();

            let result = MigrationSettings::load(&path);
            assert!(
                matches!(result, Err(ConfigError::ValidationError { .. })),
                "{content}"
            );
        }
    }

    #[test]
    fn default_templates_compile() {
        let settings = MigrationSettings::default();
        assert!(settings.validate(Path::new("defaults")).is_ok());
    }

    #[test]
    fn rejects_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(&path, r#"target-file = "version.txt""#).unwrap();

        let result = MigrationSettings::load(&path);
        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let result = MigrationSettings::load(&temp.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
