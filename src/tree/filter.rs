//! Entry filtering by ignore patterns

use glob::{Pattern, PatternError};

use super::node::TreeEntry;

/// Drops listing entries whose path has a segment matching any pattern.
///
/// Matching on segments means ignoring `node_modules` also drops everything
/// below it.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    patterns: Vec<Pattern>,
}

impl EntryFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        path.split('/')
            .any(|segment| self.patterns.iter().any(|p| p.matches(segment)))
    }

    pub fn apply(&self, entries: Vec<TreeEntry>) -> Vec<TreeEntry> {
        if self.is_empty() {
            return entries;
        }
        entries
            .into_iter()
            .filter(|entry| !self.is_ignored(&entry.path))
            .collect()
    }
}
