//! Time-boxed cache of built trees, keyed by `owner/name`

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::clock::span_between;
use crate::tree::TreeNode;

/// Default lifetime of a cached tree.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct FetchEntry {
    tree: Arc<TreeNode>,
    fetched_at: DateTime<Utc>,
}

/// Built trees by repository. The key does not include the branch, so
/// callers switching branches must invalidate first.
#[derive(Debug)]
pub struct TreeCache {
    ttl: Duration,
    entries: HashMap<String, FetchEntry>,
}

impl TreeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn key(owner: &str, name: &str) -> String {
        format!("{}/{}", owner, name)
    }

    /// Fresh entry for `key`. Entries older than the TTL count as absent and
    /// are dropped on lookup.
    pub fn get(&mut self, key: &str, now: DateTime<Utc>) -> Option<Arc<TreeNode>> {
        let entry = self.entries.get(key)?;
        if span_between(entry.fetched_at, now) > self.ttl {
            self.entries.remove(key);
            return None;
        }
        Some(Arc::clone(&entry.tree))
    }

    pub fn insert(&mut self, key: String, tree: Arc<TreeNode>, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            FetchEntry {
                tree,
                fetched_at: now,
            },
        );
    }

    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TreeCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
