//! Repository references as typed by a user

use std::fmt;
use std::str::FromStr;

use crate::error::RepoRefError;

const HOST_MARKER: &str = "github.com/";

/// An `owner/name` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`, optionally as part of a repository URL.
    ///
    /// Accepted forms include `owner/name`, `https://github.com/owner/name`,
    /// `github.com/owner/name.git` and URLs pointing deeper into the
    /// repository such as `.../owner/name/tree/main/src`.
    pub fn parse(input: &str) -> Result<Self, RepoRefError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RepoRefError::Empty);
        }

        let rest = match trimmed.find(HOST_MARKER) {
            Some(at) => &trimmed[at + HOST_MARKER.len()..],
            None => trimmed,
        };

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let (Some(owner), Some(name)) = (segments.next(), segments.next()) else {
            return Err(RepoRefError::Invalid(trimmed.to_string()));
        };
        let name = name.strip_suffix(".git").unwrap_or(name);
        if name.is_empty() || owner.contains(char::is_whitespace) || name.contains(char::is_whitespace) {
            return Err(RepoRefError::Invalid(trimmed.to_string()));
        }

        Ok(Self::new(owner, name))
    }
}

impl FromStr for RepoRef {
    type Err = RepoRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
