//! Wire types for the tree and branch listing endpoints

use serde::Deserialize;

use crate::error::FetchError;
use crate::tree::{EntryKind, TreeEntry};

/// `GET /repos/{owner}/{name}/git/trees/{branch}?recursive=1`
#[derive(Debug, Clone, Deserialize)]
pub struct TreeListing {
    #[serde(default)]
    pub sha: Option<String>,
    pub tree: Vec<ListingEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingEntry {
    pub path: String,
    #[serde(default)]
    pub mode: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Absent for `tree` entries.
    #[serde(default)]
    pub size: Option<u64>,
}

impl ListingEntry {
    /// Only `tree` entries are directories; blobs and submodule commits are
    /// leaves.
    pub fn into_entry(self) -> TreeEntry {
        let kind = if self.entry_type == "tree" {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        TreeEntry {
            path: self.path,
            kind,
            size: self.size.unwrap_or(0),
            mode: self.mode,
        }
    }
}

impl TreeListing {
    /// Decode a listing body, as returned by the API or saved from it.
    pub fn parse(body: &str) -> Result<Self, FetchError> {
        serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))
    }

    pub fn into_entries(self) -> Vec<TreeEntry> {
        self.tree.into_iter().map(ListingEntry::into_entry).collect()
    }
}

/// One element of `GET /repos/{owner}/{name}/branches`.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchInfo {
    pub name: String,
    #[serde(default)]
    pub commit: Option<CommitRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

/// Target of the `rel="next"` entry of a `Link` pagination header.
pub fn next_page_url(link: &str) -> Option<&str> {
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params.split(';').any(|param| param.trim() == r#"rel="next""#);
        is_next.then(|| target.trim().trim_start_matches('<').trim_end_matches('>'))
    })
}

/// Error body, e.g. `{"message": "Not Found", "documentation_url": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_listing() {
        let body = r#"{
            "sha": "abc123",
            "url": "https://example.invalid",
            "tree": [
                {"path": "src", "mode": "040000", "type": "tree", "sha": "1"},
                {"path": "src/main.rs", "mode": "100644", "type": "blob", "sha": "2", "size": 42},
                {"path": "vendor/lib", "mode": "160000", "type": "commit", "sha": "3"}
            ],
            "truncated": false
        }"#;
        let listing: TreeListing = serde_json::from_str(body).unwrap();
        assert_eq!(listing.sha.as_deref(), Some("abc123"));
        assert!(!listing.truncated);

        let entries = listing.into_entries();
        assert_eq!(entries[0].kind, EntryKind::Dir);
        assert_eq!(entries[0].size, 0);
        assert_eq!(entries[1].kind, EntryKind::File);
        assert_eq!(entries[1].size, 42);
        assert_eq!(entries[2].kind, EntryKind::File);
        assert_eq!(entries[2].mode, "160000");
    }

    #[test]
    fn test_next_page_url() {
        let link = r#"<https://api.github.com/repositories/7/branches?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/7/branches?per_page=100&page=4>; rel="last""#;
        assert_eq!(
            next_page_url(link),
            Some("https://api.github.com/repositories/7/branches?per_page=100&page=2")
        );

        let last_page = r#"<https://api.github.com/repositories/7/branches?page=1>; rel="prev", <https://api.github.com/repositories/7/branches?page=1>; rel="first""#;
        assert_eq!(next_page_url(last_page), None);
        assert_eq!(next_page_url(""), None);
    }

    #[test]
    fn test_parse_branches() {
        let body = r#"[
            {"name": "main", "commit": {"sha": "aaa", "url": "x"}, "protected": true},
            {"name": "dev", "commit": {"sha": "bbb", "url": "y"}}
        ]"#;
        let branches: Vec<BranchInfo> = serde_json::from_str(body).unwrap();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[1].name, "dev");
        assert_eq!(branches[0].commit.as_ref().map(|c| c.sha.as_str()), Some("aaa"));
    }

    #[test]
    fn test_parse_rejects_non_listing() {
        let err = TreeListing::parse(r#"{"message": "Bad credentials"}"#).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }
}
