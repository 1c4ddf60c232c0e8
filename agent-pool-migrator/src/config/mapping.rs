//! Pool mapping parsing.

use serde::Serialize;

/// Character separating the old and new pool name in a mapping argument.
pub const MAPPING_SEPARATOR: char = ':';

/// A single agent pool rename, parsed from an `OLD:NEW` argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolMapping {
    /// Pool name to search for.
    pub old_name: String,

    /// Pool name to write in its place.
    pub new_name: String,
}

impl PoolMapping {
    /// Creates a mapping from its two halves.
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }

    /// Parses an argument as a mapping, splitting on the first separator.
    ///
    /// Returns [`None`] when the argument contains no separator, which makes
    /// it a branch name instead. Validation happens separately in
    /// [`PoolMapping::validate`].
    #[must_use]
    pub fn parse(argument: &str) -> Option<Self> {
        argument
            .split_once(MAPPING_SEPARATOR)
            .map(|(old_name, new_name)| Self::new(old_name, new_name))
    }

    /// Checks that both names are present and differ.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.old_name.trim().is_empty() {
            return Err("old pool name must not be empty".to_string());
        }
        if self.new_name.trim().is_empty() {
            return Err("new pool name must not be empty".to_string());
        }
        if self.old_name == self.new_name {
            return Err("old and new pool names must be different".to_string());
        }
        Ok(())
    }
}

impl std::fmt::Display for PoolMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.old_name, self.new_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mapping() {
        let mapping = PoolMapping::parse("pool1:poolA").unwrap();
        assert_eq!(mapping, PoolMapping::new("pool1", "poolA"));
    }

    #[test]
    fn splits_on_first_separator_only() {
        let mapping = PoolMapping::parse("old:new:suffix").unwrap();
        assert_eq!(mapping.old_name, "old");
        assert_eq!(mapping.new_name, "new:suffix");
    }

    #[test]
    fn plain_argument_is_not_a_mapping() {
        assert!(PoolMapping::parse("master").is_none());
    }

    #[test]
    fn rejects_empty_or_identical_names() {
        assert!(PoolMapping::new("", "poolA").validate().is_err());
        assert!(PoolMapping::new("pool1", " ").validate().is_err());
        assert!(PoolMapping::new("pool1", "pool1").validate().is_err());
        assert!(PoolMapping::new("pool1", "poolA").validate().is_ok());
    }
}
