//! Repository identifiers.

use std::str::FromStr;

/// A GitHub repository in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryId {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepositoryId {
    /// Creates an identifier from its parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Full repository name in "owner/name" format.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// The same repository name under another owner, e.g. a user's fork.
    #[must_use]
    pub fn with_owner(&self, owner: &str) -> Self {
        Self::new(owner, self.name.clone())
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .split_once('/')
            .ok_or_else(|| "expected 'owner/name'".to_string())?;

        if name.contains('/') {
            return Err("expected exactly one '/'".to_string());
        }

        for (label, part) in [("owner", owner), ("name", name)] {
            if part.is_empty() {
                return Err(format!("{label} must not be empty"));
            }
            if !part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            {
                return Err(format!("{label} contains unsupported characters"));
            }
        }

        Ok(Self::new(owner, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let repo: RepositoryId = "sonic-net/sonic-buildimage".parse().unwrap();
        assert_eq!(repo.owner, "sonic-net");
        assert_eq!(repo.name, "sonic-buildimage");
        assert_eq!(repo.full_name(), "sonic-net/sonic-buildimage");
    }

    #[test]
    fn rejects_malformed_identifiers() {
        assert!("no-slash".parse::<RepositoryId>().is_err());
        assert!("a/b/c".parse::<RepositoryId>().is_err());
        assert!("/name".parse::<RepositoryId>().is_err());
        assert!("owner/".parse::<RepositoryId>().is_err());
        assert!("own er/name".parse::<RepositoryId>().is_err());
    }

    #[test]
    fn fork_keeps_name() {
        let repo = RepositoryId::new("upstream", "project");
        assert_eq!(repo.with_owner("me").full_name(), "me/project");
    }
}
